//! Frame and stack trace models.
//!
//! This module defines what a frame and a trace are and when two of them
//! are considered the same stack:
//! - `Frame`: one stack level, compared by position, name and (optionally) pc
//! - `StackTrace`: the frames of one thread, compared frame by frame

pub mod frame;
pub mod trace;

// Re-export main types and functions
pub use frame::Frame;
pub use trace::{accumulate_backtrace, collect_traces, StackTrace, TraceOptions};
