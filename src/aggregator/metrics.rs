//! Summary statistics over grouped stacks.

use super::grouping::UniqueStack;
use log::debug;

/// How much the grouping collapsed the thread list
///
/// **Public** - returned from summarize
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackSummary {
    /// Threads considered
    pub total_threads: usize,

    /// Distinct stacks found
    pub unique_stacks: usize,

    /// Threads in the most shared stack
    pub largest_group: usize,

    /// Stacks owned by exactly one thread
    pub singleton_stacks: usize,

    /// Threads per unique stack
    pub dedup_ratio: f64,
}

/// Summarize grouped stacks
///
/// **Public** - used for logging and the validate command
pub fn summarize(stacks: &[UniqueStack<'_>], total_threads: usize) -> StackSummary {
    if stacks.is_empty() {
        return StackSummary {
            total_threads,
            ..StackSummary::default()
        };
    }

    let summary = StackSummary {
        total_threads,
        unique_stacks: stacks.len(),
        largest_group: stacks.iter().map(UniqueStack::thread_count).max().unwrap_or(0),
        singleton_stacks: stacks.iter().filter(|s| s.thread_count() == 1).count(),
        dedup_ratio: total_threads as f64 / stacks.len() as f64,
    };

    debug!("Stack summary: {:?}", summary);
    summary
}

impl StackSummary {
    /// Get human-readable summary
    ///
    /// **Public** - for logging and debugging
    pub fn summary(&self) -> String {
        format!(
            "Threads: {} | Unique: {} | Largest: {} | Singletons: {} | Ratio: {:.1}x",
            self.total_threads,
            self.unique_stacks,
            self.largest_group,
            self.singleton_stacks,
            self.dedup_ratio
        )
    }
}
