//! Output JSON schema definitions for stack reports.
//!
//! This module defines the structure of JSON files we write to disk.
//! Schema is versioned to allow future evolution.

use crate::aggregator::UniqueStack;
use crate::stacks::TraceOptions;
use crate::utils::config::SCHEMA_VERSION;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Top-level report structure written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the report was generated
    pub generated_at: String,

    /// Capture options the stacks were compared under
    pub options: ReportOptions,

    /// Number of threads considered
    pub total_threads: usize,

    /// Number of distinct stacks
    pub unique_stacks: usize,

    /// Stacks, most shared first
    pub groups: Vec<StackGroup>,
}

/// Capture options echoed into the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOptions {
    pub skip_frames: usize,

    /// `None` when unbounded
    pub frame_limit: Option<usize>,

    pub ignore_pc: bool,
}

/// One unique stack and the threads sharing it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackGroup {
    /// Thread numbers, ascending
    pub thread_ids: Vec<u64>,

    /// Identity of each member thread
    pub threads: Vec<ThreadEntry>,

    /// Frames of the shared stack, newest first
    pub frames: Vec<FrameEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadEntry {
    pub num: u64,
    pub pid: u64,
    pub lwpid: u64,
    pub tid: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameEntry {
    pub position: usize,

    /// Hex program counter, absent when pcs were ignored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pc: Option<String>,

    pub name: String,
}

impl From<&TraceOptions> for ReportOptions {
    fn from(options: &TraceOptions) -> Self {
        Self {
            skip_frames: options.skip_frames,
            frame_limit: options.limit(),
            ignore_pc: options.ignore_pc,
        }
    }
}

/// Convert grouped stacks to the report format
///
/// **Public** - used by commands to create final output
pub fn to_report(
    stacks: &[UniqueStack<'_>],
    total_threads: usize,
    options: &TraceOptions,
) -> StackReport {
    let groups = stacks
        .iter()
        .map(|stack| StackGroup {
            thread_ids: stack.thread_ids(),
            threads: stack
                .members
                .iter()
                .map(|trace| {
                    let info = trace.thread();
                    ThreadEntry {
                        num: info.num,
                        pid: info.pid,
                        lwpid: info.lwpid,
                        tid: info.tid,
                    }
                })
                .collect(),
            frames: stack
                .trace
                .frames()
                .iter()
                .map(|frame| FrameEntry {
                    position: frame.position(),
                    pc: (!frame.ignore_pc()).then(|| format!("{:#x}", frame.pc())),
                    name: frame.name().to_string(),
                })
                .collect(),
        })
        .collect();

    StackReport {
        version: SCHEMA_VERSION.to_string(),
        generated_at: Utc::now().to_rfc3339(),
        options: options.into(),
        total_threads,
        unique_stacks: stacks.len(),
        groups,
    }
}
