//! Stack frame value type and the throwable input contract.
//!
//! A `StackFrame` is one call-site record inside a reported exception.
//! Frames are immutable and compared structurally; the trie relies on
//! that equality to deduplicate siblings.

use crate::utils::config::SYNTHETIC_LINE;

/// One call-site record: declaring type, method, optional source file, line.
///
/// **Public** - building block for everything else in the registry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StackFrame {
    /// Fully qualified declaring type name (e.g. `java.io.FileInputStream`)
    pub class_name: String,

    /// Method name, empty for synthetic frames
    pub method_name: String,

    /// Source file name, if known
    pub file_name: Option<String>,

    /// 1-based source line; `-2` means native method, non-positive means unknown
    pub line_number: i32,
}

impl StackFrame {
    /// Create a new frame
    ///
    /// **Public** - constructor
    pub fn new(
        class_name: impl Into<String>,
        method_name: impl Into<String>,
        file_name: Option<String>,
        line_number: i32,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
            file_name,
            line_number,
        }
    }

    /// Class name with the package prefix stripped.
    ///
    /// Nested-class separators (`$`) are kept, matching the conventional
    /// "simple name" used in trace summaries.
    pub fn simple_class_name(&self) -> &str {
        simple_class_name(&self.class_name)
    }

    /// Stand-in frame for a throwable reported with an empty trace.
    ///
    /// Some runtimes throw canned exceptions without any frames; those all
    /// collapse to a single node keyed by the throwable's class name.
    pub(crate) fn synthetic(throwable_class_name: &str) -> Self {
        Self::new(throwable_class_name, "", None, SYNTHETIC_LINE)
    }
}

/// Strip the package prefix from a fully qualified class name
pub(crate) fn simple_class_name(class_name: &str) -> &str {
    match class_name.rfind('.') {
        Some(idx) => &class_name[idx + 1..],
        None => class_name,
    }
}

/// Strip both package and enclosing-class prefixes, the way throwable
/// headers are rendered (`Outer$Inner` shows as `Inner`). Frames keep
/// their `$` segments; only the summary header uses this.
pub(crate) fn throwable_simple_name(class_name: &str) -> &str {
    match class_name.rfind(|c| c == '.' || c == '$') {
        Some(idx) => &class_name[idx + 1..],
        None => class_name,
    }
}

/// Input contract for `ExceptionRegistry::register`.
///
/// Anything that can name its runtime class and list its frames
/// (innermost first, the conventional trace order) can be registered.
pub trait Throwable {
    /// Fully qualified class name of the thrown type
    fn class_name(&self) -> &str;

    /// Frames in trace order: index 0 is the innermost (most recent) call.
    /// May be empty.
    fn frames(&self) -> &[StackFrame];
}

/// Owned throwable snapshot, the usual way callers feed the registry.
///
/// **Public** - produced by the trace-text parser, or built directly
/// by callers that observe live exceptions
#[derive(Debug, Clone)]
pub struct CapturedException {
    /// Fully qualified class name of the thrown type
    pub class_name: String,

    /// Frames in trace order (innermost first)
    pub frames: Vec<StackFrame>,
}

impl CapturedException {
    /// Create a new captured exception
    pub fn new(class_name: impl Into<String>, frames: Vec<StackFrame>) -> Self {
        Self {
            class_name: class_name.into(),
            frames,
        }
    }
}

impl Throwable for CapturedException {
    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn frames(&self) -> &[StackFrame] {
        &self.frames
    }
}
