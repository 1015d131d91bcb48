use crate::aggregator::{group_traces, summarize};
use crate::host::SnapshotHost;
use crate::output::read_json_report;
use crate::stacks::{collect_traces, TraceOptions};
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::Path;

/// Validate a thread snapshot file
pub fn validate_snapshot_file(file_path: &Path) -> Result<()> {
    println!("Validating snapshot: {}", file_path.display());

    let mut host = SnapshotHost::open(file_path)?;
    let snapshot = host.snapshot().clone();

    println!("✓ Valid snapshot JSON");
    if let Some(executable) = &snapshot.executable {
        println!("  Executable: {}", executable);
    }
    if let Some(pid) = snapshot.pid {
        println!("  Pid: {}", pid);
    }
    println!("  Threads: {}", snapshot.threads.len());
    println!("  Frames: {}", snapshot.frame_count());
    println!("  Invalid Threads: {}", snapshot.invalid_thread_count());

    if snapshot.threads.is_empty() {
        println!("  ⚠ No threads to group");
    } else if snapshot.invalid_thread_count() == 0 {
        let traces = collect_traces(&mut host, &TraceOptions::default())
            .context("Failed to capture backtraces")?;
        let stacks = group_traces(&traces);
        println!("  {}", summarize(&stacks, traces.len()).summary());
    }

    Ok(())
}

/// Validate a JSON stack report
pub fn validate_report_file(file_path: &Path) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_json_report(file_path)?;

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Generated: {}", report.generated_at);
    println!("  Threads: {}", report.total_threads);
    println!("  Unique Stacks: {}", report.unique_stacks);

    if report.version != SCHEMA_VERSION {
        println!("  ⚠ Schema version differs from current v{}", SCHEMA_VERSION);
    }

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("uniq-stacks v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Prints each distinct thread stack once, with the threads that share it.");
}
