//! Configuration and constants for the CLI.

/// Current JSON report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Frames skipped from the top of every stack unless `--skip` is given
pub const DEFAULT_SKIP_FRAMES: usize = 0;

/// Deepest frame position considered unless a limit is given (unbounded)
pub const DEFAULT_FRAME_LIMIT: usize = usize::MAX;

/// Width of the right-aligned `#position` column in frame listings
pub const FRAME_POSITION_WIDTH: usize = 3;

/// Suffix appended to the name of frames produced by inline expansion
pub const INLINE_MARKER: &str = " [inlined]";

/// Folded-stack label for a thread with no frames at all
pub const NO_FRAMES_LABEL: &str = "[no frames]";

/// Environment variable consulted for the snapshot path
pub const SNAPSHOT_ENV: &str = "UNIQ_STACKS_SNAPSHOT";
