//! Output formatting module

use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format and output a single delivered line
    fn format_line(&mut self, number: u64, line: &str) -> Result<()>;

    /// Finalize output (e.g., flush buffered writes)
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

/// Supported output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `N: line`, one delivered line per output line
    #[default]
    Text,
    /// One JSON object per delivered line
    Json,
}

/// Create the formatter for `format` writing to `writer`
pub fn create_formatter<'a, W: Write + 'a>(
    format: OutputFormat,
    writer: W,
) -> Box<dyn OutputFormatter + 'a> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(writer)),
        OutputFormat::Json => Box::new(JsonFormatter::new(writer)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_formatter_text() {
        let mut out = Vec::new();
        {
            let mut formatter = create_formatter(OutputFormat::Text, &mut out);
            formatter.format_line(6, "fig").unwrap();
            formatter.finish().unwrap();
        }
        assert_eq!(String::from_utf8(out).unwrap(), "6: fig\n");
    }

    #[test]
    fn test_create_formatter_json() {
        let mut out = Vec::new();
        {
            let mut formatter = create_formatter(OutputFormat::Json, &mut out);
            formatter.format_line(1, "apple").unwrap();
            formatter.finish().unwrap();
        }
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"line\":1,\"text\":\"apple\"}\n"
        );
    }

    #[test]
    fn test_format_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            format: OutputFormat,
        }
        let parsed: Wrapper = toml::from_str("format = \"json\"").unwrap();
        assert_eq!(parsed.format, OutputFormat::Json);
    }
}
