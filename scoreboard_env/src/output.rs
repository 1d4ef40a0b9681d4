//! Line-oriented output sink for the scoreboard protocol.

use std::io::{self, Write};

/// Destination for protocol output lines.
///
/// The command runner writes every line through this trait so the same
/// code path serves the real stdout stream and in-memory capture for
/// simulations and tests.
///
/// # Implementations
///
/// - **Production**: `StdoutOutput` - buffered, locked stdout
/// - **Capture**: `BufferOutput` - collects lines in memory
pub trait BoardOutput {
    /// Writes one line (without its terminator).
    fn line(&mut self, text: &str) -> io::Result<()>;

    /// Flushes any buffered output.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Buffered stdout sink.
pub struct StdoutOutput {
    out: io::BufWriter<io::StdoutLock<'static>>,
}

impl StdoutOutput {
    /// Creates a sink over the process stdout.
    pub fn new() -> Self {
        Self {
            out: io::BufWriter::new(io::stdout().lock()),
        }
    }
}

impl Default for StdoutOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardOutput for StdoutOutput {
    fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl Drop for StdoutOutput {
    fn drop(&mut self) {
        let _ = self.out.flush();
    }
}

/// In-memory sink that records every line.
#[derive(Debug, Default, Clone)]
pub struct BufferOutput {
    lines: Vec<String>,
}

impl BufferOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the captured lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Returns the captured output joined with newlines.
    pub fn text(&self) -> String {
        let mut text = self.lines.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        text
    }
}

impl BoardOutput for BufferOutput {
    fn line(&mut self, text: &str) -> io::Result<()> {
        self.lines.push(text.to_string());
        Ok(())
    }
}
