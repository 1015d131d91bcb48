//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors raised by a debugging host
#[derive(Error, Debug)]
pub enum HostError {
    #[error("Debugging host unavailable: {0}")]
    Unavailable(String),

    #[error("No thread is currently selected")]
    NoSelectedThread,

    #[error("Unknown thread: {0}")]
    UnknownThread(u64),
}

/// Errors that can occur while capturing stack traces
#[derive(Error, Debug)]
pub enum UniqError {
    /// The thread exited; its identity can no longer be queried
    #[error("Invalid thread object")]
    InvalidThread,

    #[error(transparent)]
    Host(#[from] HostError),
}

/// Errors that can occur while loading a thread snapshot
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid snapshot format: {0}")]
    InvalidFormat(String),
}

/// Errors that can occur during flamegraph generation
#[derive(Error, Debug)]
pub enum FlamegraphError {
    #[error("Empty stack data")]
    EmptyStacks,

    #[error("Failed to render flamegraph: {0}")]
    Render(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
