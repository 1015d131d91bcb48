//! uniq-stacks
//!
//! Isolates the distinct call stacks among the threads of a stopped
//! process. Instead of reading hundreds of near-identical backtraces,
//! each unique stack is printed once with the threads that share it.
//!
//! ## Getting Started
//!
//! ```bash
//! uniq-stacks uniq --snapshot threads.json
//! uniq-stacks uniq --snapshot threads.json 8 --skip 2 --ignore-pc
//! ```
//!
//! Library users plug their own debugger in through [`host::DebugHost`]
//! and call [`commands::run`].

pub mod aggregator;
pub mod commands;
pub mod flamegraph;
pub mod host;
pub mod output;
pub mod stacks;
pub mod utils;
