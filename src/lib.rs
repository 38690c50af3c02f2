//! Exception Registry
//!
//! In-process exception deduplication and frequency ranking.
//!
//! Reported stack traces are folded into a shared trie of frames and
//! counted per distinct trace, so "what are the most frequent
//! exceptions" queries are cheap and no full copy of every occurrence is
//! ever stored.
//!
//! ## Getting Started
//!
//! ```
//! use exception_registry::{CapturedException, ExceptionRegistry, StackFrame};
//!
//! let registry = ExceptionRegistry::new();
//! let exception = CapturedException::new(
//!     "java.io.FileNotFoundException",
//!     vec![StackFrame::new(
//!         "java.io.FileInputStream",
//!         "open",
//!         Some("FileInputStream.java".to_string()),
//!         195,
//!     )],
//! );
//!
//! let trace = registry.register(&exception);
//! registry.register(&exception);
//!
//! assert_eq!(trace.count(), 2);
//! assert_eq!(registry.count(), 2);
//! ```
//!
//! The `exception-registry` CLI wraps the same library to turn trace log
//! captures into frequency reports.

pub mod commands;
pub mod parser;
pub mod registry;
pub mod report;
pub mod utils;

// The registry surface is the crate's main API
pub use registry::{
    CapturedException, Clock, ExceptionRegistry, ManualClock, StackFrame, StackTrace,
    SystemClock, Throwable,
};
