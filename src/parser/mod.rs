//! Stack-trace text parsing.
//!
//! This module handles:
//! - Parsing conventional `Header` + `\tat ...` trace text
//! - Mapping native / unknown-source frames to line sentinels
//! - Splitting multi-trace input into individual exceptions

pub mod trace_text;

// Re-export main types
pub use trace_text::{parse_trace, parse_traces};
