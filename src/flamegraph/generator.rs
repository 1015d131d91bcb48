//! SVG flamegraph of unique stacks, rendered by inferno.
//!
//! Each unique stack becomes one folded line, root first:
//! `start_thread;worker;nanosleep 3`, weighted by the number of threads
//! sharing it. The widest towers are the most common stacks.

use crate::aggregator::UniqueStack;
use crate::utils::config::NO_FRAMES_LABEL;
use crate::utils::error::FlamegraphError;
use inferno::flamegraph::{self, Options};
use log::info;

/// Flamegraph configuration
#[derive(Debug, Clone)]
pub struct FlamegraphConfig {
    pub title: String,

    /// Image width in pixels, `None` for inferno's default
    pub width: Option<usize>,
}

impl Default for FlamegraphConfig {
    fn default() -> Self {
        Self {
            title: "Unique Thread Stacks".to_string(),
            width: None,
        }
    }
}

impl FlamegraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }
}

/// Fold each unique stack into `root;...;leaf count` form
pub fn folded_lines(stacks: &[UniqueStack<'_>]) -> Vec<String> {
    stacks
        .iter()
        .map(|stack| {
            let frames = stack.trace.frames();
            let path = if frames.is_empty() {
                NO_FRAMES_LABEL.to_string()
            } else {
                frames
                    .iter()
                    .rev()
                    .map(|frame| frame.name().replace(';', ":"))
                    .collect::<Vec<_>>()
                    .join(";")
            };
            format!("{} {}", path, stack.thread_count())
        })
        .collect()
}

/// Generate SVG flamegraph from unique stacks
pub fn generate_flamegraph(
    stacks: &[UniqueStack<'_>],
    config: &FlamegraphConfig,
) -> Result<String, FlamegraphError> {
    if stacks.is_empty() {
        return Err(FlamegraphError::EmptyStacks);
    }

    info!("Generating flamegraph with {} stacks", stacks.len());

    let lines = folded_lines(stacks);

    let mut options = Options::default();
    options.title = config.title.clone();
    options.count_name = "threads".to_string();
    options.image_width = config.width;

    let mut svg = Vec::new();
    flamegraph::from_lines(&mut options, lines.iter().map(String::as_str), &mut svg)
        .map_err(|e| FlamegraphError::Render(e.to_string()))?;

    info!("Flamegraph generated successfully ({} bytes)", svg.len());
    Ok(String::from_utf8_lossy(&svg).into_owned())
}
