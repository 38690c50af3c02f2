//! Leaf handle: the per-distinct-trace counter and metadata object.
//!
//! A `StackTrace` is what `register` hands back to callers. It is a live
//! view onto one distinct (throwable class, frame sequence) pair: the
//! occurrence counter keeps moving as further equal traces are
//! registered, while the identity-defining fields (class name, frames,
//! first-hit time) are frozen at creation. The MD5 fingerprint is a pure
//! function of those frozen fields and is computed once, on demand.

use super::frame::{throwable_simple_name, StackFrame};
use crate::utils::config::NATIVE_METHOD_LINE;
use md5::{Digest, Md5};
use std::cmp::Ordering;
use std::fmt::Write as _;
use std::hash::{Hash, Hasher};
use std::io;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, OnceLock};

/// Separator between frames in `summarize` output
const SUMMARY_ARROW: char = '\u{2190}'; // ←

/// Shared state behind a leaf handle.
///
/// Owned jointly by the registry's leaf list and by every handle cloned
/// out to callers; `clear()` drops the registry's reference but handles
/// already returned stay usable.
#[derive(Debug)]
pub(crate) struct LeafData {
    throwable_class_name: String,
    /// Frames innermost first, root sentinel excluded
    frames: Vec<StackFrame>,
    first_hit_ms: i64,
    count: AtomicU64,
    /// Lazily computed; identity fields never change, so no invalidation
    md5: OnceLock<[u8; 16]>,
}

impl LeafData {
    pub(crate) fn new(
        throwable_class_name: impl Into<String>,
        frames: Vec<StackFrame>,
        first_hit_ms: i64,
    ) -> Self {
        Self {
            throwable_class_name: throwable_class_name.into(),
            frames,
            first_hit_ms,
            count: AtomicU64::new(1),
            md5: OnceLock::new(),
        }
    }

    pub(crate) fn count(&self) -> u64 {
        self.count.load(AtomicOrdering::Relaxed)
    }

    /// Called under the registry lock when an equal trace is re-registered
    pub(crate) fn increment(&self) {
        self.count.fetch_add(1, AtomicOrdering::Relaxed);
    }

    pub(crate) fn frames(&self) -> &[StackFrame] {
        &self.frames
    }

    pub(crate) fn md5(&self) -> [u8; 16] {
        *self
            .md5
            .get_or_init(|| fingerprint(&self.throwable_class_name, &self.frames))
    }

    pub(crate) fn md5_string(&self) -> String {
        let mut hex = String::with_capacity(32);
        for byte in self.md5() {
            let _ = write!(hex, "{:02X}", byte);
        }
        hex
    }
}

/// Live handle to one distinct registered trace.
///
/// **Public** - returned by `register` and the registry queries; cheap to
/// clone, compares equal only to handles of the same underlying leaf
#[derive(Debug, Clone)]
pub struct StackTrace {
    data: Arc<LeafData>,
}

impl StackTrace {
    pub(crate) fn new(data: Arc<LeafData>) -> Self {
        Self { data }
    }

    /// How many times this exact trace has been registered so far
    pub fn count(&self) -> u64 {
        self.data.count()
    }

    /// Timestamp (epoch ms) of the first registration; never updated
    pub fn time_of_first_hit_ms(&self) -> i64 {
        self.data.first_hit_ms
    }

    /// Fully qualified class name of the throwable
    pub fn class_name(&self) -> &str {
        &self.data.throwable_class_name
    }

    /// Frames innermost first (the conventional trace order)
    pub fn frames(&self) -> &[StackFrame] {
        self.data.frames()
    }

    /// MD5 fingerprint of the class name plus frame sequence
    pub fn md5(&self) -> [u8; 16] {
        self.data.md5()
    }

    /// Fingerprint as 32 uppercase hex characters
    pub fn md5_string(&self) -> String {
        self.data.md5_string()
    }

    /// One-line summary: `Class: frame1←frame2←…`, truncated to `max_width`.
    ///
    /// The header is the throwable's innermost simple name (both package
    /// and enclosing-class prefixes stripped). Frames are then walked from
    /// the leaf outward; a frame normally renders as
    /// `SimpleClass.method:line`, the class is elided while it repeats the
    /// previous frame's, the method additionally while it repeats too, and
    /// non-positive line numbers are omitted. If truncation is needed the
    /// tail is replaced with a single `…`.
    pub fn summarize(&self, max_width: usize) -> String {
        let mut out = String::new();
        out.push_str(throwable_simple_name(&self.data.throwable_class_name));
        out.push_str(": ");

        let mut prev: Option<&StackFrame> = None;
        for frame in self.data.frames() {
            let mut segment = String::new();

            let same_class = prev.map_or(false, |p| p.class_name == frame.class_name);
            let same_method = same_class
                && prev.map_or(false, |p| p.method_name == frame.method_name);

            if !same_class {
                segment.push_str(frame.simple_class_name());
                if !frame.method_name.is_empty() {
                    segment.push('.');
                    segment.push_str(&frame.method_name);
                }
            } else if !same_method {
                segment.push_str(&frame.method_name);
            }

            if frame.line_number > 0 {
                if !segment.is_empty() {
                    segment.push(':');
                }
                let _ = write!(segment, "{}", frame.line_number);
            }

            // Fully elided and no line to show; repeat the method so the
            // slot stays visible
            if segment.is_empty() {
                segment.push_str(&frame.method_name);
            }

            if prev.is_some() {
                out.push(SUMMARY_ARROW);
            }
            out.push_str(&segment);
            prev = Some(frame);
        }

        truncate_with_ellipsis(out, max_width)
    }

    /// Conventional multi-line rendering, as a string.
    ///
    /// `ClassName:` header, then one `\tat Class.method(File:line)` line
    /// per frame, leaf outward. Native frames (line `-2`) render as
    /// `(Native Method)`, frames without a file as `(Unknown Source)`.
    pub fn to_stack_trace(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.data.throwable_class_name);
        out.push_str(":\n");

        for frame in self.data.frames() {
            out.push_str("\tat ");
            out.push_str(&frame.class_name);
            if !frame.method_name.is_empty() {
                out.push('.');
                out.push_str(&frame.method_name);
            }

            if frame.line_number == NATIVE_METHOD_LINE {
                out.push_str("(Native Method)");
            } else {
                match &frame.file_name {
                    Some(file) if frame.line_number > 0 => {
                        let _ = write!(out, "({}:{})", file, frame.line_number);
                    }
                    Some(file) => {
                        let _ = write!(out, "({})", file);
                    }
                    None => out.push_str("(Unknown Source)"),
                }
            }
            out.push('\n');
        }
        out
    }

    /// Write the multi-line rendering to `writer`
    pub fn print_stack_trace<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.to_stack_trace().as_bytes())
    }

    /// Total order used for frequency reports: descending count first,
    /// then a structural walk of the frame chains from the leaf outward.
    pub fn compare(&self, other: &StackTrace) -> Ordering {
        other
            .count()
            .cmp(&self.count())
            .then_with(|| compare_frame_chains(self.frames(), other.frames()))
    }
}

/// Handles are equal when they view the same leaf, regardless of clones
impl PartialEq for StackTrace {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl Eq for StackTrace {}

impl Hash for StackTrace {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.data) as usize).hash(state);
    }
}

/// Structural comparison of two frame chains, leaf outward: class name,
/// then method, then file (empty when absent), then line; first
/// difference wins, shorter chain first on a shared prefix.
pub(crate) fn compare_frame_chains(a: &[StackFrame], b: &[StackFrame]) -> Ordering {
    for (fa, fb) in a.iter().zip(b.iter()) {
        let ord = fa
            .class_name
            .cmp(&fb.class_name)
            .then_with(|| fa.method_name.cmp(&fb.method_name))
            .then_with(|| {
                let file_a = fa.file_name.as_deref().unwrap_or("");
                let file_b = fb.file_name.as_deref().unwrap_or("");
                file_a.cmp(file_b)
            })
            .then_with(|| fa.line_number.cmp(&fb.line_number));
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

/// Digest the identity fields in walk order. Strings are fed as UTF-8
/// with a NUL terminator each so field boundaries cannot alias; the line
/// number goes in as 4 little-endian bytes.
fn fingerprint(throwable_class_name: &str, frames: &[StackFrame]) -> [u8; 16] {
    let mut hasher = Md5::new();
    hasher.update(throwable_class_name.as_bytes());
    hasher.update([0u8]);
    for frame in frames {
        hasher.update(frame.class_name.as_bytes());
        hasher.update([0u8]);
        hasher.update(frame.method_name.as_bytes());
        hasher.update([0u8]);
        if let Some(file) = &frame.file_name {
            hasher.update(file.as_bytes());
        }
        hasher.update([0u8]);
        hasher.update(frame.line_number.to_le_bytes());
    }
    hasher.finalize().into()
}

/// Truncate to `max_width` characters, ending in a single `…` when the
/// input was longer. A separator arrow the cut lands on is dropped first.
fn truncate_with_ellipsis(text: String, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        return text;
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out: String = text.chars().take(max_width - 1).collect();
    if out.ends_with(SUMMARY_ARROW) {
        out.pop();
    }
    out.push('\u{2026}');
    out
}
