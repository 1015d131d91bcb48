//! Uniq command implementation.
//!
//! The uniq command:
//! 1. Loads the thread snapshot
//! 2. Captures one backtrace per thread
//! 3. Groups identical backtraces
//! 4. Prints the unique stacks, most shared first
//! 5. Writes optional JSON report and flamegraph

use crate::aggregator::{group_traces, summarize, UniqueStack};
use crate::commands::models::UniqArgs;
use crate::flamegraph::generate_flamegraph;
use crate::host::{DebugHost, SnapshotHost};
use crate::output::{to_report, validate_path, write_json_report, write_report, write_svg};
use crate::stacks::{collect_traces, StackTrace, TraceOptions};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::io::Write;
use std::time::Instant;

/// Capture, group and report the unique stacks of every thread on `host`
///
/// **Public** - core operation, independent of where threads come from
///
/// Every trace is captured before the first byte is written, so a failing
/// thread leaves `out` untouched.
///
/// # Returns
/// The captured traces, in thread enumeration order
///
/// # Errors
/// * Invalid thread encountered while capturing
/// * Host failures (no threads, focus switching)
/// * Write errors on `out`
pub fn run<H, W>(host: &mut H, options: &TraceOptions, out: &mut W) -> Result<Vec<StackTrace>>
where
    H: DebugHost,
    W: Write,
{
    let traces = capture(host, options)?;
    let stacks = group_traces(&traces);
    report(&stacks, traces.len(), out)?;

    Ok(traces)
}

/// Execute the uniq command, printing the report to stdout
///
/// **Public** - main entry point called from main.rs
pub fn execute_uniq(args: UniqArgs) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute_uniq_into(args, &mut out)
}

/// Execute the uniq command, printing the report to `out`
///
/// The report reaches `out` only after the JSON report and flamegraph
/// have been written, so any failure leaves `out` untouched.
///
/// # Errors
/// * Snapshot cannot be loaded
/// * Capture failures (invalid thread, host errors)
/// * File write errors
pub fn execute_uniq_into<W: Write>(args: UniqArgs, out: &mut W) -> Result<()> {
    let start_time = Instant::now();

    info!("Loading snapshot: {}", args.snapshot.display());
    let mut host = SnapshotHost::open(&args.snapshot).with_context(|| {
        format!("Failed to load snapshot {}", args.snapshot.display())
    })?;

    let traces = capture(&mut host, &args.options)?;
    let stacks = group_traces(&traces);

    let mut buffer = Vec::new();
    report(&stacks, traces.len(), &mut buffer)?;

    write_outputs(&args, &stacks, traces.len())?;

    out.write_all(&buffer).context("Failed to write report")?;
    out.flush().context("Failed to write report")?;

    info!(
        "Completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}

/// **Private** - capture every thread, attaching command context
fn capture<H: DebugHost>(host: &mut H, options: &TraceOptions) -> Result<Vec<StackTrace>> {
    collect_traces(host, options).context("Failed to capture backtraces")
}

/// **Private** - log the summary line and write the text report
fn report<W: Write>(stacks: &[UniqueStack<'_>], total_threads: usize, out: &mut W) -> Result<()> {
    info!("{}", summarize(stacks, total_threads).summary());
    write_report(out, stacks, total_threads).context("Failed to write report")
}

/// Write output files (JSON report and optional SVG flamegraph).
///
/// **Private** - internal helper for execute_uniq_into
fn write_outputs(args: &UniqArgs, stacks: &[UniqueStack<'_>], total_threads: usize) -> Result<()> {
    if let Some(json_path) = &args.output_json {
        let stack_report = to_report(stacks, total_threads, &args.options);
        write_json_report(&stack_report, json_path).context("Failed to write JSON report")?;
        info!("✓ Report written to: {}", json_path.display());
    }

    if let Some(svg_path) = &args.output_svg {
        let config = args.flamegraph_config.clone().unwrap_or_default();
        let svg = generate_flamegraph(stacks, &config).context("Failed to generate flamegraph")?;
        write_svg(&svg, svg_path).context("Failed to write flamegraph SVG")?;
        info!("✓ Flamegraph written to: {}", svg_path.display());
    }

    Ok(())
}

/// Validate uniq arguments
///
/// **Public** - can be called before execute_uniq for early validation
pub fn validate_args(args: &UniqArgs) -> Result<()> {
    if args.snapshot.as_os_str().is_empty() {
        anyhow::bail!("Snapshot path cannot be empty");
    }

    if let Some(path) = &args.output_json {
        validate_path(path).context("Invalid --json path")?;
    }

    if let Some(path) = &args.output_svg {
        validate_path(path).context("Invalid --flamegraph path")?;
    }

    let options = &args.options;
    if options.skip_frames > options.frame_limit {
        warn!(
            "--skip {} is beyond the frame limit {}; every stack will be empty",
            options.skip_frames, options.frame_limit
        );
    }

    debug!("Arguments validated: {:?}", options);
    Ok(())
}
