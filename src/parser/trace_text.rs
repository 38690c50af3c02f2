//! Parse conventional stack-trace text into captured exceptions.
//!
//! The accepted shape is what JVM-style runtimes print:
//!
//! ```text
//! java.io.FileNotFoundException: /tmp/missing
//!     at java.io.FileInputStream.open0(Native Method)
//!     at java.io.FileInputStream.open(FileInputStream.java:195)
//! ```
//!
//! A header line starts a new exception; every following `at` line adds a
//! frame. Garbled `at` lines and `... N more` continuation lines are
//! skipped rather than rejected, per the registry's defensive stance on
//! malformed frame data.

use crate::registry::{CapturedException, StackFrame};
use crate::utils::config::{NATIVE_METHOD_LINE, UNKNOWN_LINE};
use crate::utils::error::ParseError;
use log::debug;

/// Parse a single exception from trace text
///
/// **Public** - convenience wrapper over `parse_traces`
///
/// # Errors
/// * `ParseError::MissingHeader` - no exception header line in the input
pub fn parse_trace(text: &str) -> Result<CapturedException, ParseError> {
    parse_traces(text)?
        .into_iter()
        .next()
        .ok_or(ParseError::MissingHeader)
}

/// Parse every exception found in the input.
///
/// **Public** - used by the report command to ingest whole trace files
///
/// Exceptions are separated by blank lines or simply by the next header
/// line; both styles appear in real log captures.
///
/// # Errors
/// * `ParseError::MissingHeader` - the input contains no exception at all
pub fn parse_traces(text: &str) -> Result<Vec<CapturedException>, ParseError> {
    let mut exceptions = Vec::new();
    let mut current: Option<CapturedException> = None;

    for raw_line in text.lines() {
        let line = raw_line.trim();

        if line.is_empty() {
            if let Some(done) = current.take() {
                exceptions.push(done);
            }
            continue;
        }

        if let Some(rest) = line.strip_prefix("at ") {
            match current.as_mut() {
                Some(exception) => {
                    if let Some(frame) = parse_frame(rest) {
                        exception.frames.push(frame);
                    } else {
                        debug!("skipping malformed frame line: {}", line);
                    }
                }
                // Frame line with no header above it; nothing to attach to
                None => debug!("skipping orphan frame line: {}", line),
            }
            continue;
        }

        // "... 23 more" continuation from a cause chain
        if line.starts_with("...") {
            continue;
        }

        // Anything else is a header starting a new exception
        if let Some(done) = current.take() {
            exceptions.push(done);
        }
        current = Some(CapturedException::new(class_name_from_header(line), Vec::new()));
    }

    if let Some(done) = current.take() {
        exceptions.push(done);
    }

    if exceptions.is_empty() {
        return Err(ParseError::MissingHeader);
    }

    debug!("parsed {} exception(s) from trace text", exceptions.len());
    Ok(exceptions)
}

/// Extract the throwable class name from a header line.
///
/// The message after the first `:` is dropped; `Caused by:` prefixes are
/// stripped so cause chains register under their own class.
fn class_name_from_header(header: &str) -> String {
    let header = header.strip_prefix("Caused by:").unwrap_or(header).trim();
    match header.find(':') {
        Some(idx) => header[..idx].trim().to_string(),
        None => header.to_string(),
    }
}

/// Parse the body of one `at` line, e.g.
/// `java.io.FileInputStream.open(FileInputStream.java:195)`.
///
/// Returns `None` when the call part cannot be split into class and
/// method.
fn parse_frame(rest: &str) -> Option<StackFrame> {
    let (call, location) = match rest.find('(') {
        Some(idx) => {
            let loc = rest[idx + 1..].trim_end().trim_end_matches(')');
            (rest[..idx].trim(), Some(loc))
        }
        None => (rest.trim(), None),
    };

    let dot = call.rfind('.')?;
    let class_name = &call[..dot];
    let method_name = &call[dot + 1..];
    if class_name.is_empty() || method_name.is_empty() {
        return None;
    }

    let (file_name, line_number) = match location {
        Some("Native Method") => (None, NATIVE_METHOD_LINE),
        Some("Unknown Source") | None => (None, UNKNOWN_LINE),
        Some(loc) => match loc.rfind(':') {
            Some(idx) => match loc[idx + 1..].parse::<i32>() {
                Ok(line) => (Some(loc[..idx].to_string()), line),
                Err(_) => (Some(loc.to_string()), UNKNOWN_LINE),
            },
            None => (Some(loc.to_string()), UNKNOWN_LINE),
        },
    };

    Some(StackFrame::new(class_name, method_name, file_name, line_number))
}
