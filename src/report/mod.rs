//! Frequency-report rendering.
//!
//! The registry itself never decides when or how its contents are
//! reported; this module is the in-crate collaborator that turns a
//! registry snapshot into:
//! - a fixed-width text table (count, MD5, optional summary per line)
//! - a JSON document for downstream tooling

pub mod json;
pub mod schema;
pub mod text;

// Re-export main types and functions
pub use json::{read_report, write_report};
pub use schema::{build_report, FrequencyReport, ReportEntry, ReportFrame};
pub use text::{render_text_report, TextReportOptions};
