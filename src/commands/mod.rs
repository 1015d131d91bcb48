//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod models;
pub mod uniq;
pub mod utils;

// Re-export main command functions
pub use models::UniqArgs;
pub use uniq::{execute_uniq, execute_uniq_into, run, validate_args};
pub use utils::{display_version, validate_report_file, validate_snapshot_file};
