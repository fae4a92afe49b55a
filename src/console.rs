// MIT License - Copyright (c) 2026 Peter Wright
// Operator-facing output

use std::fmt;
use std::io::Write;

use tracing::warn;

/// Prompt shown before each input line.
pub const PROMPT: &str = "> ";

/// Line-oriented sink for everything the operator sees: command output,
/// update notifications and diagnostics.
///
/// Write failures are logged and swallowed so that a broken terminal never
/// takes the command or update path down with it.
pub struct Console<W: Write> {
    out: W,
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Write one line and flush.
    pub fn line(&mut self, text: impl fmt::Display) {
        if let Err(e) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            warn!("Failed to write to console: {e}");
        }
    }

    pub fn prompt(&mut self) {
        if let Err(e) = write!(self.out, "{PROMPT}").and_then(|()| self.out.flush()) {
            warn!("Failed to write prompt: {e}");
        }
    }
}

impl Console<Vec<u8>> {
    /// Captured output as text. Used by tests.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.out).into_owned()
    }
}
