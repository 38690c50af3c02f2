//! Report schema definitions and snapshot building.

use crate::registry::{ExceptionRegistry, StackFrame, StackTrace};
use crate::utils::config::{
    MIN_SUMMARY_WIDTH, REPORT_SCHEMA_VERSION, SUMMARY_COLUMN_RESERVE,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Complete frequency report, ready for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyReport {
    /// Schema version (e.g. "1.0.0")
    pub version: String,

    /// Generation timestamp, RFC 3339
    pub generated_at: String,

    /// Total registrations at snapshot time
    pub total_registrations: u64,

    /// Distinct traces, most frequent first
    pub entries: Vec<ReportEntry>,
}

/// One distinct trace in the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Occurrence count
    pub count: u64,

    /// MD5 fingerprint, 32 uppercase hex chars
    pub md5: String,

    /// One-line summary of the frame chain
    pub summary: String,

    /// Epoch ms of the first registration
    pub first_hit_ms: i64,

    /// Throwable class name
    pub class_name: String,

    /// Frames, innermost first
    pub frames: Vec<ReportFrame>,
}

/// One frame in a report entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportFrame {
    pub class_name: String,
    pub method_name: String,
    pub file_name: Option<String>,
    pub line_number: i32,
}

impl From<&StackFrame> for ReportFrame {
    fn from(frame: &StackFrame) -> Self {
        Self {
            class_name: frame.class_name.clone(),
            method_name: frame.method_name.clone(),
            file_name: frame.file_name.clone(),
            line_number: frame.line_number,
        }
    }
}

/// Width available to the summary column for a given report width
pub(crate) fn summary_width(max_width: usize) -> usize {
    max_width
        .saturating_sub(SUMMARY_COLUMN_RESERVE)
        .max(MIN_SUMMARY_WIDTH)
}

/// Snapshot the registry into a serializable report.
///
/// **Public** - used by the report command for JSON output
///
/// Entries follow `stack_traces_with_threshold` order: most frequent
/// first, structural tie-break on equal counts.
pub fn build_report(
    registry: &ExceptionRegistry,
    threshold: u64,
    max_width: usize,
) -> FrequencyReport {
    let width = summary_width(max_width);
    let entries = registry
        .stack_traces_with_threshold(threshold)
        .iter()
        .map(|trace| entry_for(trace, width))
        .collect();

    FrequencyReport {
        version: REPORT_SCHEMA_VERSION.to_string(),
        generated_at: Utc::now().to_rfc3339(),
        total_registrations: registry.count(),
        entries,
    }
}

fn entry_for(trace: &StackTrace, summary_width: usize) -> ReportEntry {
    ReportEntry {
        count: trace.count(),
        md5: trace.md5_string(),
        summary: trace.summarize(summary_width),
        first_hit_ms: trace.time_of_first_hit_ms(),
        class_name: trace.class_name().to_string(),
        frames: trace.frames().iter().map(ReportFrame::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CapturedException;

    #[test]
    fn test_summary_width_clamps() {
        assert_eq!(summary_width(300), 260);
        assert_eq!(summary_width(60), 20);
        assert_eq!(summary_width(10), 20); // floor wins over underflow
    }

    #[test]
    fn test_build_report_orders_and_counts() {
        let registry = ExceptionRegistry::new();
        let common = CapturedException::new(
            "java.io.IOException",
            vec![StackFrame::new("a.A", "m", Some("A.java".to_string()), 1)],
        );
        let rare = CapturedException::new("java.lang.NullPointerException", Vec::new());

        registry.register(&common);
        registry.register(&common);
        registry.register(&rare);

        let report = build_report(&registry, 0, 300);

        assert_eq!(report.version, REPORT_SCHEMA_VERSION);
        assert_eq!(report.total_registrations, 3);
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.entries[0].count, 2);
        assert_eq!(report.entries[0].class_name, "java.io.IOException");
        assert_eq!(report.entries[1].count, 1);
        assert_eq!(report.entries[0].md5.len(), 32);
    }

    #[test]
    fn test_build_report_applies_threshold() {
        let registry = ExceptionRegistry::new();
        let once = CapturedException::new("x.A", Vec::new());
        let twice = CapturedException::new("x.B", Vec::new());

        registry.register(&once);
        registry.register(&twice);
        registry.register(&twice);

        let report = build_report(&registry, 2, 300);
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].class_name, "x.B");
    }
}
