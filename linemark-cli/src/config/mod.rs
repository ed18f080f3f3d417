//! Configuration module

use crate::error::{CliError, CliResult};
use crate::output::OutputFormat;
use anyhow::Context;
use linemark_core::ReaderConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// CLI configuration structure
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct CliConfig {
    /// Reader configuration
    #[serde(default)]
    pub reader: ReaderConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Output-related configuration
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct OutputConfig {
    /// Default output format for `read`
    #[serde(default)]
    pub default_format: OutputFormat,
}

impl CliConfig {
    /// Load the configuration file, or the defaults when none is given
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: CliConfig = toml::from_str(&content)
            .map_err(|e| CliError::ConfigError(format!("{}: {e}", path.display())))?;
        config
            .reader
            .validate()
            .map_err(|e| CliError::ConfigError(e.to_string()))?;

        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply command-line overrides on top of the file configuration
    pub fn with_save_every(mut self, save_every: Option<u64>) -> CliResult<Self> {
        if let Some(lines) = save_every {
            self.reader.save_every = lines;
            self.reader
                .validate()
                .map_err(|e| CliError::ConfigError(e.to_string()))?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_file() {
        let config = CliConfig::load(None).unwrap();
        assert_eq!(config.reader, ReaderConfig::default());
        assert_eq!(config.output.default_format, OutputFormat::Text);
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[reader]\nsave_every = 50\n\n[output]\ndefault_format = \"json\""
        )
        .unwrap();

        let config = CliConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.reader.save_every, 50);
        assert_eq!(config.reader.checkpoint_suffix, "settings.json");
        assert_eq!(config.output.default_format, OutputFormat::Json);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[reader]\nsave_every = 0").unwrap();

        let err = CliConfig::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("save_every"));
    }

    #[test]
    fn test_missing_file() {
        let err = CliConfig::load(Some(Path::new("/nonexistent/linemark.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_save_every_override() {
        let config = CliConfig::default().with_save_every(Some(3)).unwrap();
        assert_eq!(config.reader.save_every, 3);

        assert!(CliConfig::default().with_save_every(Some(0)).is_err());
        let unchanged = CliConfig::default().with_save_every(None).unwrap();
        assert_eq!(unchanged.reader.save_every, 10);
    }
}
