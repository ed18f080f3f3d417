//! JSON Lines output formatter

use super::OutputFormatter;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// JSON formatter - writes one object per delivered line as it arrives
pub struct JsonFormatter<W: Write> {
    writer: W,
}

/// Data structure for JSON output
#[derive(Debug, Serialize, Deserialize)]
pub struct LineData<'a> {
    /// One-based line number in the source file
    pub line: u64,
    /// The line content without its terminator
    pub text: &'a str,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputFormatter for JsonFormatter<W> {
    fn format_line(&mut self, number: u64, line: &str) -> Result<()> {
        let data = LineData {
            line: number,
            text: line,
        };
        serde_json::to_writer(&mut self.writer, &data)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
