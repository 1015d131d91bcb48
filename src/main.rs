//! uniq-stacks CLI
//!
//! Prints the unique call stacks of a thread snapshot, each annotated
//! with the threads that share it.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use uniq_stacks::commands::{
    display_version, execute_uniq, validate_args, validate_report_file, validate_snapshot_file,
    UniqArgs,
};
use uniq_stacks::flamegraph::FlamegraphConfig;
use uniq_stacks::stacks::TraceOptions;
use uniq_stacks::utils::config::{DEFAULT_FRAME_LIMIT, DEFAULT_SKIP_FRAMES, SNAPSHOT_ENV};

/// uniq-stacks - unique thread stacks of a stopped process
#[derive(Parser, Debug)]
#[command(name = "uniq-stacks")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the unique stacks of every thread in a snapshot
    Uniq {
        /// Thread snapshot (JSON)
        #[arg(short, long, env = SNAPSHOT_ENV)]
        snapshot: PathBuf,

        /// Only consider [limit] stack frames
        limit: Option<usize>,

        /// Skip first [N] stack frames
        #[arg(long, value_name = "N", default_value_t = DEFAULT_SKIP_FRAMES)]
        skip: usize,

        /// Ignore program counter for frame equivalence
        #[arg(long)]
        ignore_pc: bool,

        /// Output path for JSON report (optional)
        #[arg(long)]
        json: Option<PathBuf>,

        /// Output path for SVG flamegraph (optional)
        #[arg(short, long)]
        flamegraph: Option<PathBuf>,

        /// Flamegraph title
        #[arg(long)]
        title: Option<String>,

        /// Flamegraph width in pixels
        #[arg(long)]
        width: Option<usize>,
    },

    /// Validate a snapshot or report JSON file
    Validate {
        /// Path to a thread snapshot
        #[arg(short, long, conflicts_with = "report", required_unless_present = "report")]
        snapshot: Option<PathBuf>,

        /// Path to a JSON report written by `uniq --json`
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging (stderr, so stdout carries only the report)
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Uniq {
            snapshot,
            limit,
            skip,
            ignore_pc,
            json,
            flamegraph,
            title,
            width,
        } => {
            let fg_config = if flamegraph.is_some() {
                let mut config = FlamegraphConfig::new();

                if let Some(title_str) = title {
                    config = config.with_title(title_str);
                }

                if let Some(width) = width {
                    config = config.with_width(width);
                }

                Some(config)
            } else {
                None
            };

            let args = UniqArgs {
                snapshot,
                options: TraceOptions {
                    skip_frames: skip,
                    frame_limit: limit.unwrap_or(DEFAULT_FRAME_LIMIT),
                    ignore_pc,
                },
                output_json: json,
                output_svg: flamegraph,
                flamegraph_config: fg_config,
            };

            // Validate args first
            validate_args(&args)?;

            execute_uniq(args)?;
        }

        Commands::Validate { snapshot, report } => {
            match (snapshot, report) {
                (Some(path), _) => validate_snapshot_file(&path)?,
                (None, Some(path)) => validate_report_file(&path)?,
                (None, None) => anyhow::bail!("Pass --snapshot or --report"),
            }
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
