use crate::flamegraph::FlamegraphConfig;
use crate::stacks::TraceOptions;
use std::path::PathBuf;

/// Arguments for the uniq command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct UniqArgs {
    /// Thread snapshot to inspect
    pub snapshot: PathBuf,

    /// Skip / limit / ignore-pc settings
    pub options: TraceOptions,

    /// Output path for JSON report (optional)
    pub output_json: Option<PathBuf>,

    /// Output path for SVG flamegraph (optional)
    pub output_svg: Option<PathBuf>,

    /// Flamegraph configuration
    pub flamegraph_config: Option<FlamegraphConfig>,
}

impl Default for UniqArgs {
    fn default() -> Self {
        Self {
            snapshot: PathBuf::from("snapshot.json"),
            options: TraceOptions::default(),
            output_json: None,
            output_svg: None,
            flamegraph_config: None,
        }
    }
}
