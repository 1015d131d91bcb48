//! Plain-text report of unique stacks.
//!
//! Layout:
//! ```text
//!
//! == Printing 2 unique stacks from 5 threads
//!
//! Stack for thread ids [1, 2, 4]
//! #  0 0x4005d0 foo
//! #  1 0x400610 bar
//!
//! Stack for thread ids [3, 5]
//! ...
//! ```

use crate::aggregator::UniqueStack;
use std::io::{self, Write};

/// Write the report for `stacks` to `out` and flush it
///
/// **Public** - main entry point for console output
///
/// # Arguments
/// * `out` - Sink receiving the report
/// * `stacks` - Grouped stacks, already in report order
/// * `total_threads` - Number of traces that were grouped
pub fn write_report<W: Write>(
    out: &mut W,
    stacks: &[UniqueStack<'_>],
    total_threads: usize,
) -> io::Result<()> {
    write!(
        out,
        "\n== Printing {} unique stacks from {} threads\n\n",
        stacks.len(),
        total_threads
    )?;

    for stack in stacks {
        writeln!(out, "Stack for thread ids {:?}", stack.thread_ids())?;
        write!(out, "{}", stack.trace)?;
        write!(out, "\n\n")?;
    }

    out.flush()
}

/// Render the report into a string
///
/// **Public** - useful for tests and in-memory use
pub fn render_report(stacks: &[UniqueStack<'_>], total_threads: usize) -> String {
    let mut buffer = Vec::new();
    // Writing into a Vec cannot fail
    let _ = write_report(&mut buffer, stacks, total_threads);
    String::from_utf8_lossy(&buffer).into_owned()
}
