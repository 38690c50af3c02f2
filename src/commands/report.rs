//! Report command implementation.
//!
//! The report command:
//! 1. Reads one or more trace text files
//! 2. Parses and registers every exception found
//! 3. Prints the frequency report to stdout
//! 4. Optionally writes a JSON report

use crate::parser::parse_traces;
use crate::registry::ExceptionRegistry;
use crate::report::{build_report, render_text_report, write_report, TextReportOptions};
use crate::utils::config::{DEFAULT_REPORT_WIDTH, MIN_REPORT_WIDTH};
use anyhow::{bail, Context, Result};
use log::{debug, info};
use std::path::PathBuf;

/// Arguments for the report command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ReportArgs {
    /// Trace text files to ingest
    pub inputs: Vec<PathBuf>,

    /// Minimum count for a trace to appear in the report
    pub threshold: u64,

    /// Line width budget for the text report
    pub max_width: usize,

    /// Output path for the JSON report (optional)
    pub json_output: Option<PathBuf>,

    /// Include stack-trace summaries in the text report
    pub include_summaries: bool,
}

impl Default for ReportArgs {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            threshold: 0,
            max_width: DEFAULT_REPORT_WIDTH,
            json_output: None,
            include_summaries: true,
        }
    }
}

/// Validate report arguments before doing any work
///
/// **Public** - called from main.rs
pub fn validate_args(args: &ReportArgs) -> Result<()> {
    if args.inputs.is_empty() {
        bail!("at least one input file is required");
    }
    if args.max_width < MIN_REPORT_WIDTH {
        bail!(
            "report width {} is too narrow, minimum is {}",
            args.max_width,
            MIN_REPORT_WIDTH
        );
    }
    Ok(())
}

/// Execute the report command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Input file read failures
/// * Trace parsing failures (a file with no exception at all)
/// * JSON report write failures
pub fn execute_report(args: ReportArgs) -> Result<()> {
    let registry = ExceptionRegistry::new();

    for path in &args.inputs {
        info!("Ingesting traces from: {}", path.display());

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let exceptions = parse_traces(&text)
            .with_context(|| format!("Failed to parse traces in {}", path.display()))?;

        debug!("{}: {} exception(s)", path.display(), exceptions.len());
        for exception in &exceptions {
            registry.register(exception);
        }
    }

    info!(
        "Registered {} exception(s), {} distinct trace(s)",
        registry.count(),
        registry.stack_traces().len()
    );

    let options = TextReportOptions {
        threshold: args.threshold,
        max_width: args.max_width,
        include_summaries: args.include_summaries,
    };
    print!("{}", render_text_report(&registry, &options));

    if let Some(json_path) = &args.json_output {
        let report = build_report(&registry, args.threshold, args.max_width);
        write_report(&report, json_path)
            .with_context(|| format!("Failed to write JSON report to {}", json_path.display()))?;
    }

    Ok(())
}
