//! Flamegraph generation using the inferno library.
//!
//! This module converts unique stacks into interactive SVG flamegraphs,
//! giving a visual overview of which stacks most threads are parked in.

pub mod generator;

// Re-export main types
pub use generator::{folded_lines, generate_flamegraph, FlamegraphConfig};
