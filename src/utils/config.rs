//! Configuration and constants.

/// Current frequency-report schema version
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Default line width for text frequency reports
pub const DEFAULT_REPORT_WIDTH: usize = 300;

/// Minimum usable report width (the count and hash columns alone take ~40 chars)
pub const MIN_REPORT_WIDTH: usize = 60;

/// Characters reserved per report line for the count and hash columns
pub const SUMMARY_COLUMN_RESERVE: usize = 40;

/// Floor for the summary column, no matter how narrow the report
pub const MIN_SUMMARY_WIDTH: usize = 20;

// Line-number sentinels, following the JVM convention for frames that
// carry no source line.
pub const NATIVE_METHOD_LINE: i32 = -2;
pub const UNKNOWN_LINE: i32 = -1;

/// Line number of the synthetic frame standing in for an empty trace
pub const SYNTHETIC_LINE: i32 = 0;
