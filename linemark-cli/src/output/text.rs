//! Plain text output formatter

use super::OutputFormatter;
use anyhow::Result;
use std::io::Write;

/// Plain text formatter - outputs `N: line` for each delivered line
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputFormatter for TextFormatter<W> {
    fn format_line(&mut self, number: u64, line: &str) -> Result<()> {
        writeln!(self.writer, "{number}: {line}")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_line_verbatim() {
        let mut out = Vec::new();
        let mut formatter = TextFormatter::new(&mut out);
        formatter.format_line(1, "  padded  ").unwrap();
        formatter.format_line(2, "").unwrap();
        formatter.finish().unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "1:   padded  \n2: \n");
    }
}
