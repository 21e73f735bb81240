// crates/testcorpus-cli/src/tests/output.rs
// ============================================================================
// Module: CLI Output Sink Tests
// Description: Unit tests for human, JSON, and silent sinks.
// Purpose: Ensure each mode writes only what it should.
// Dependencies: testcorpus-cli output module
// ============================================================================

//! ## Overview
//! Drives each sink against an in-memory writer.

#![allow(clippy::expect_used, reason = "Unit tests use expect for setup clarity.")]

use crate::output::JsonSink;
use crate::output::OutputSink;
use crate::output::SilentSink;
use crate::output::Style;
use crate::output::TerminalSink;

#[test]
fn terminal_sink_writes_plain_lines_without_color() {
    let mut sink = TerminalSink::new(Vec::new(), false);
    sink.line(Style::Heading, "Summary").expect("line");
    sink.line(Style::Plain, "  keyword: 3").expect("line");
    let text = String::from_utf8(sink.into_inner()).expect("utf8");
    assert_eq!(text, "Summary\n  keyword: 3\n");
}

#[test]
fn terminal_sink_styles_lines_with_color() {
    let mut sink = TerminalSink::new(Vec::new(), true);
    sink.line(Style::Warning, "stale").expect("line");
    sink.line(Style::Plain, "plain").expect("line");
    let text = String::from_utf8(sink.into_inner()).expect("utf8");
    assert_eq!(text, "\u{1b}[33mstale\u{1b}[0m\nplain\n");
}

#[test]
fn terminal_sink_passes_documents_through() {
    let mut sink = TerminalSink::new(Vec::new(), true);
    sink.json(b"{}").expect("json");
    assert_eq!(sink.into_inner(), b"{}\n");
}

#[test]
fn json_sink_drops_lines_and_keeps_document() {
    let mut sink = JsonSink::new(Vec::new());
    sink.line(Style::Success, "ignored").expect("line");
    sink.json(b"{\"total_tests\":3}\n").expect("json");
    assert_eq!(sink.into_inner(), b"{\"total_tests\":3}\n");
}

#[test]
fn silent_sink_accepts_everything() {
    let mut sink = SilentSink;
    sink.line(Style::Plain, "ignored").expect("line");
    sink.json(b"{}").expect("json");
}
