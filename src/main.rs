//! Exception Registry CLI
//!
//! Turns trace log captures into exception frequency reports: parses
//! textual stack traces, deduplicates them through the registry, and
//! prints the most frequent traces with their MD5 fingerprints.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use exception_registry::commands::{execute_report, validate_args, ReportArgs};
use exception_registry::utils::config::{DEFAULT_REPORT_WIDTH, REPORT_SCHEMA_VERSION};

/// Exception Registry - stack trace deduplication and frequency ranking
#[derive(Parser, Debug)]
#[command(name = "exception-registry")]
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
    /// Ingest trace files and print a frequency report
    Report {
        /// Trace text files to ingest
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Minimum count for a trace to appear in the report
        #[arg(short, long, default_value = "0")]
        threshold: u64,

        /// Line width budget for the text report
        #[arg(long, default_value_t = DEFAULT_REPORT_WIDTH)]
        max_width: usize,

        /// Output path for a JSON report (optional)
        #[arg(short, long)]
        json: Option<PathBuf>,

        /// Omit the stack-trace summary column
        #[arg(long)]
        no_summaries: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Report {
            input,
            threshold,
            max_width,
            json,
            no_summaries,
        } => {
            let args = ReportArgs {
                inputs: input,
                threshold,
                max_width,
                json_output: json,
                include_summaries: !no_summaries,
            };

            // Validate args first
            validate_args(&args)?;

            // Execute report
            execute_report(args)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("Exception Registry v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", REPORT_SCHEMA_VERSION);
    println!();
    println!("In-process exception deduplication and frequency ranking.");
}
