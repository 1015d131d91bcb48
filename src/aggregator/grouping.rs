//! Partition stack traces into classes of identical stacks.
//!
//! Classes are kept in first-occurrence order while grouping, then
//! stable-sorted by population. Two classes of the same size therefore
//! always come out in the order their first trace was seen.

use crate::stacks::StackTrace;
use log::debug;
use std::collections::HashMap;

/// One equivalence class of traces
///
/// **Public** - consumed by the report writers
#[derive(Debug, Clone)]
pub struct UniqueStack<'a> {
    /// First trace seen with this stack
    pub trace: &'a StackTrace,

    /// Every trace with this stack, ordered by thread number
    pub members: Vec<&'a StackTrace>,
}

impl UniqueStack<'_> {
    /// Number of threads sharing this stack
    pub fn thread_count(&self) -> usize {
        self.members.len()
    }

    /// Numbers of the threads sharing this stack, ascending
    pub fn thread_ids(&self) -> Vec<u64> {
        self.members.iter().map(|t| t.thread_num()).collect()
    }
}

/// Group traces into unique stacks
///
/// **Public** - main entry point for aggregation
///
/// # Arguments
/// * `traces` - One trace per thread, in capture order
///
/// # Returns
/// Unique stacks, most shared first
///
/// # Algorithm
/// 1. Single pass: look each trace up in an index keyed by trace
/// 2. New stacks append a class; known stacks append the trace
/// 3. Stable sort by descending thread count
/// 4. Order each class's members by thread number
pub fn group_traces(traces: &[StackTrace]) -> Vec<UniqueStack<'_>> {
    debug!("Grouping {} traces", traces.len());

    let mut index: HashMap<&StackTrace, usize> = HashMap::new();
    let mut stacks: Vec<UniqueStack<'_>> = Vec::new();

    for trace in traces {
        match index.get(trace) {
            Some(&slot) => stacks[slot].members.push(trace),
            None => {
                index.insert(trace, stacks.len());
                stacks.push(UniqueStack {
                    trace,
                    members: vec![trace],
                });
            }
        }
    }

    // `sort_by` is stable: equal sizes keep first-occurrence order
    stacks.sort_by(|a, b| b.thread_count().cmp(&a.thread_count()));
    for stack in &mut stacks {
        stack.members.sort_by_key(|t| t.thread_num());
    }

    debug!("Found {} unique stacks", stacks.len());
    stacks
}
