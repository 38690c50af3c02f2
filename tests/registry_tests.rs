//! End-to-end registry tests driving the public surface the way the
//! diagnostics collaborators do: parse realistic trace text, register,
//! then query and render.

use exception_registry::parser::parse_trace;
use exception_registry::report::{render_text_report, TextReportOptions};
use exception_registry::{
    CapturedException, Clock, ExceptionRegistry, ManualClock, StackTrace,
};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::sync::Arc;

const FILE_NOT_FOUND: &str = "\
java.io.FileNotFoundException: /idea/config (No such file or directory)
\tat java.io.FileInputStream.open0(Native Method)
\tat java.io.FileInputStream.open(FileInputStream.java:195)
\tat java.io.FileInputStream.<init>(FileInputStream.java:138)
\tat org.jetbrains.jps.backwardRefs.CompilerBackwardReferenceIndex.versionDiffers(CompilerBackwardReferenceIndex.java:162)
";

// A variation ending on the same outer frames as FILE_NOT_FOUND
const FILE_NOT_FOUND_SHORT: &str = "\
java.io.FileNotFoundException: /idea/config (No such file or directory)
\tat java.io.FileInputStream.<init>(FileInputStream.java:138)
\tat org.jetbrains.jps.backwardRefs.CompilerBackwardReferenceIndex.versionDiffers(CompilerBackwardReferenceIndex.java:162)
";

const JDWP_ERROR: &str = "\
com.sun.jdi.InternalException: Unexpected JDWP Error: 35
\tat com.sun.tools.jdi.JDWPException.toJDIException(JDWPException.java:65)
\tat com.sun.tools.jdi.StackFrameImpl.getValues(StackFrameImpl.java:241)
\tat com.intellij.debugger.jdi.StackFrameProxyImpl.getAllValues(StackFrameProxyImpl.java:365)
";

fn exception(text: &str) -> CapturedException {
    parse_trace(text).unwrap()
}

/// The documented end-to-end scenario: a frequent frameless exception
/// next to a rare one with frames.
#[test]
fn test_frequency_ranking_scenario() {
    let registry = ExceptionRegistry::new();

    let frequent = CapturedException::new(
        "java.lang.ArrayIndexOutOfBoundsException",
        Vec::new(),
    );
    for _ in 0..10 {
        registry.register(&frequent);
    }
    let rare = registry.register(&exception(JDWP_ERROR));

    assert_eq!(registry.count(), 11);

    let top = registry.most_frequent().unwrap();
    assert_eq!(top.count(), 10);
    assert_eq!(
        top.class_name(),
        "java.lang.ArrayIndexOutOfBoundsException"
    );

    let over_threshold = registry.stack_traces_with_threshold(5);
    assert_eq!(over_threshold.len(), 1);
    assert_eq!(over_threshold[0], top);

    assert_eq!(registry.find(&top.md5_string()), Some(top));
    assert_eq!(registry.find(&rare.md5_string()), Some(rare));
}

/// A trace ending on the interior of an existing chain gets its own leaf.
#[test]
fn test_insert_leaf_into_existing_chain() {
    let registry = ExceptionRegistry::new();

    let long = registry.register(&exception(FILE_NOT_FOUND));
    let short = registry.register(&exception(FILE_NOT_FOUND_SHORT));

    assert_eq!(registry.count(), 2);
    assert_ne!(long, short);
    assert_ne!(long.md5_string(), short.md5_string());
    assert_eq!(registry.stack_traces().len(), 2);
}

#[test]
fn test_report_layout_and_order() {
    let registry = ExceptionRegistry::new();

    for _ in 0..11 {
        registry.register(&exception(FILE_NOT_FOUND));
    }
    registry.register(&exception(JDWP_ERROR));
    registry.register(&exception(JDWP_ERROR));

    let traces = registry.stack_traces();
    let expected = format!(
        "    11 {} {}\n     2 {} {}\n",
        traces[0].md5_string(),
        traces[0].summarize(260),
        traces[1].md5_string(),
        traces[1].summarize(260),
    );

    let report = render_text_report(&registry, &TextReportOptions::default());
    assert_eq!(report, expected);

    assert!(report.starts_with(
        "    11"
    ));
    assert!(report.contains("FileNotFoundException: FileInputStream.open0←open:195←<init>:138"));
}

#[test]
fn test_summaries_elide_and_truncate() {
    let registry = ExceptionRegistry::new();
    let trace = registry.register(&exception(FILE_NOT_FOUND));

    assert_eq!(
        trace.summarize(300),
        "FileNotFoundException: FileInputStream.open0←open:195←<init>:138\
         ←CompilerBackwardReferenceIndex.versionDiffers:162"
    );

    let narrow = trace.summarize(60);
    assert!(narrow.chars().count() <= 60);
    assert!(narrow.ends_with('…'));
}

#[test]
fn test_parsed_trace_renders_back() {
    let registry = ExceptionRegistry::new();
    let trace = registry.register(&exception(FILE_NOT_FOUND));

    let expected = "\
java.io.FileNotFoundException:
\tat java.io.FileInputStream.open0(Native Method)
\tat java.io.FileInputStream.open(FileInputStream.java:195)
\tat java.io.FileInputStream.<init>(FileInputStream.java:138)
\tat org.jetbrains.jps.backwardRefs.CompilerBackwardReferenceIndex.versionDiffers(CompilerBackwardReferenceIndex.java:162)
";
    assert_eq!(trace.to_stack_trace(), expected);
}

/// First-hit timestamps follow the injected clock and only move on the
/// first registration of each distinct trace.
#[test]
fn test_first_hit_timestamps_with_manual_clock() {
    let clock = Arc::new(ManualClock::new(1_000_000));
    let registry = ExceptionRegistry::with_clock(clock.clone());

    let interval_ms = 10 * 60 * 1000;
    let inputs = [FILE_NOT_FOUND, FILE_NOT_FOUND_SHORT, JDWP_ERROR, FILE_NOT_FOUND];

    let mut first_seen: HashMap<StackTrace, i64> = HashMap::new();
    for text in inputs {
        let trace = registry.register(&exception(text));
        if trace.count() == 1 {
            first_seen.insert(trace, clock.now_ms());
        }
        clock.advance_ms(interval_ms);
    }

    let traces = registry.stack_traces();
    assert_eq!(traces.len(), first_seen.len());
    for trace in traces {
        assert_eq!(first_seen[&trace], trace.time_of_first_hit_ms());
    }
}

#[test]
fn test_clear_then_register_starts_fresh() {
    let registry = ExceptionRegistry::new();

    registry.register(&exception(FILE_NOT_FOUND));
    registry.register(&exception(JDWP_ERROR));
    registry.clear();

    assert_eq!(registry.count(), 0);
    assert_eq!(registry.stack_traces().len(), 0);

    registry.register(&exception(JDWP_ERROR));
    assert_eq!(registry.count(), 1);
    assert_eq!(registry.stack_traces().len(), 1);
}
