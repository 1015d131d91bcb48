//! Aggregation of stack traces into unique stacks.
//!
//! This module transforms per-thread traces into:
//! - Unique stacks with the threads that share them (most shared first)
//! - Summary statistics about how much the stacks collapsed

pub mod grouping;
pub mod metrics;

// Re-export main types and functions
pub use grouping::{group_traces, UniqueStack};
pub use metrics::{summarize, StackSummary};
