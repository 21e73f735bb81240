// crates/testcorpus-cli/src/output.rs
// ============================================================================
// Module: CLI Output Sinks
// Description: Human, JSON, and silent renderings of command results.
// Purpose: Keep presentation choices out of the corpus engine.
// Dependencies: Standard library.
// ============================================================================

//! ## Overview
//! Commands describe their results as styled lines plus one optional JSON
//! document. An [`OutputSink`] chosen once from the [`OutputMode`] decides
//! what actually reaches the writer:
//!
//! - [`TerminalSink`] writes the lines, with ANSI styling only when enabled,
//!   and passes JSON documents through (dry-run manifests).
//! - [`JsonSink`] drops the lines and writes the JSON document.
//! - [`SilentSink`] writes nothing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::io::IsTerminal;
use std::io::Write;

// ============================================================================
// SECTION: Modes
// ============================================================================

/// Environment variable that disables ANSI styling when set.
pub const NO_COLOR_ENV: &str = "NO_COLOR";

/// Output presentation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Styled, human-readable lines.
    #[default]
    Human,
    /// One JSON document on stdout.
    Json,
    /// No stdout output; only the exit code.
    Silent,
}

/// Line style hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Unstyled text.
    Plain,
    /// Section heading.
    Heading,
    /// Successful outcome.
    Success,
    /// Warning or attention needed.
    Warning,
}

impl Style {
    /// Returns the ANSI prefix for the style.
    const fn ansi(self) -> Option<&'static str> {
        match self {
            Self::Plain => None,
            Self::Heading => Some("\u{1b}[1m"),
            Self::Success => Some("\u{1b}[32m"),
            Self::Warning => Some("\u{1b}[33m"),
        }
    }
}

/// ANSI reset sequence.
const ANSI_RESET: &str = "\u{1b}[0m";

// ============================================================================
// SECTION: Sink Trait
// ============================================================================

/// Destination for command results.
pub trait OutputSink {
    /// Writes one styled line.
    ///
    /// # Errors
    ///
    /// Returns the writer's I/O error.
    fn line(&mut self, style: Style, text: &str) -> io::Result<()>;

    /// Writes a JSON document (already rendered).
    ///
    /// # Errors
    ///
    /// Returns the writer's I/O error.
    fn json(&mut self, bytes: &[u8]) -> io::Result<()>;
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Human-readable sink.
#[derive(Debug)]
pub struct TerminalSink<W: Write> {
    /// Destination writer.
    writer: W,
    /// Emit ANSI styling.
    color: bool,
}

impl<W: Write> TerminalSink<W> {
    /// Creates a terminal sink over a writer.
    pub const fn new(writer: W, color: bool) -> Self {
        Self {
            writer,
            color,
        }
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputSink for TerminalSink<W> {
    fn line(&mut self, style: Style, text: &str) -> io::Result<()> {
        match style.ansi().filter(|_| self.color) {
            Some(prefix) => writeln!(self.writer, "{prefix}{text}{ANSI_RESET}"),
            None => writeln!(self.writer, "{text}"),
        }
    }

    fn json(&mut self, bytes: &[u8]) -> io::Result<()> {
        write_document(&mut self.writer, bytes)
    }
}

/// JSON-only sink.
#[derive(Debug)]
pub struct JsonSink<W: Write> {
    /// Destination writer.
    writer: W,
}

impl<W: Write> JsonSink<W> {
    /// Creates a JSON sink over a writer.
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
        }
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputSink for JsonSink<W> {
    fn line(&mut self, _style: Style, _text: &str) -> io::Result<()> {
        Ok(())
    }

    fn json(&mut self, bytes: &[u8]) -> io::Result<()> {
        write_document(&mut self.writer, bytes)
    }
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSink;

impl OutputSink for SilentSink {
    fn line(&mut self, _style: Style, _text: &str) -> io::Result<()> {
        Ok(())
    }

    fn json(&mut self, _bytes: &[u8]) -> io::Result<()> {
        Ok(())
    }
}

// ============================================================================
// SECTION: Selection
// ============================================================================

/// Returns true when stdout styling should be used.
#[must_use]
pub fn stdout_supports_color(no_color: Option<&str>) -> bool {
    no_color.is_none_or(str::is_empty) && io::stdout().is_terminal()
}

/// Builds the stdout sink for a mode.
#[must_use]
pub fn stdout_sink(mode: OutputMode, color: bool) -> Box<dyn OutputSink> {
    match mode {
        OutputMode::Human => Box::new(TerminalSink::new(io::stdout(), color)),
        OutputMode::Json => Box::new(JsonSink::new(io::stdout())),
        OutputMode::Silent => Box::new(SilentSink),
    }
}

/// Writes a document and guarantees a trailing newline.
fn write_document<W: Write>(writer: &mut W, bytes: &[u8]) -> io::Result<()> {
    writer.write_all(bytes)?;
    if !bytes.ends_with(b"\n") {
        writer.write_all(b"\n")?;
    }
    writer.flush()
}
