//! Fixed-width text frequency report.
//!
//! One line per distinct trace, most frequent first:
//!
//! ```text
//!     11 379B89010804F9BC03263B09AF393F22 FileNotFoundException: FileInputStream.open0←…
//!      2 9368342549412E5433B10250266402AF NullPointerException: …
//! ```
//!
//! Column layout: count right-aligned in 6 chars, 32-char hash, then the
//! summary within whatever width remains of the line budget.

use super::schema::summary_width;
use crate::registry::ExceptionRegistry;
use crate::utils::config::DEFAULT_REPORT_WIDTH;
use std::fmt::Write as _;

/// Knobs for the text report
///
/// **Public** - constructed by the report command from CLI flags
#[derive(Debug, Clone)]
pub struct TextReportOptions {
    /// Minimum count for a trace to appear
    pub threshold: u64,

    /// Whole-line width budget; the summary column absorbs the remainder
    pub max_width: usize,

    /// Include the stack-trace summary column
    pub include_summaries: bool,
}

impl Default for TextReportOptions {
    fn default() -> Self {
        Self {
            threshold: 0,
            max_width: DEFAULT_REPORT_WIDTH,
            include_summaries: true,
        }
    }
}

/// Render the registry as a text report
///
/// **Public** - main entry point for text output
pub fn render_text_report(registry: &ExceptionRegistry, options: &TextReportOptions) -> String {
    let width = summary_width(options.max_width);
    let mut out = String::new();

    for trace in registry.stack_traces_with_threshold(options.threshold) {
        if options.include_summaries {
            let _ = writeln!(
                out,
                "{:>6} {:>32} {}",
                trace.count(),
                trace.md5_string(),
                trace.summarize(width)
            );
        } else {
            let _ = writeln!(out, "{:>6} {:>32}", trace.count(), trace.md5_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CapturedException;
    use pretty_assertions::assert_eq;

    fn populated_registry() -> ExceptionRegistry {
        let registry = ExceptionRegistry::new();
        let common = CapturedException::new("java.io.IOException", Vec::new());
        let rare = CapturedException::new("java.lang.NullPointerException", Vec::new());

        registry.register(&common);
        registry.register(&common);
        registry.register(&rare);
        registry
    }

    #[test]
    fn test_report_layout_without_summaries() {
        let registry = populated_registry();
        let traces = registry.stack_traces();

        let expected = format!(
            "     2 {}\n     1 {}\n",
            traces[0].md5_string(),
            traces[1].md5_string()
        );

        let report = render_text_report(
            &registry,
            &TextReportOptions {
                include_summaries: false,
                ..Default::default()
            },
        );
        assert_eq!(report, expected);
    }

    #[test]
    fn test_report_includes_summaries() {
        let registry = populated_registry();
        let report = render_text_report(&registry, &TextReportOptions::default());

        let first_line = report.lines().next().unwrap();
        assert!(first_line.ends_with("IOException: IOException"));
    }

    #[test]
    fn test_report_respects_threshold() {
        let registry = populated_registry();
        let report = render_text_report(
            &registry,
            &TextReportOptions {
                threshold: 2,
                ..Default::default()
            },
        );
        assert_eq!(report.lines().count(), 1);
    }

    #[test]
    fn test_empty_registry_renders_empty_report() {
        let registry = ExceptionRegistry::new();
        let report = render_text_report(&registry, &TextReportOptions::default());
        assert_eq!(report, "");
    }
}
