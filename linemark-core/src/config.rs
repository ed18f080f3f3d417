//! Reader configuration
//!
//! A [`ReaderConfig`] controls how often progress is persisted, where the
//! checkpoint lives relative to the source file and how much of the file
//! is buffered at once.

use crate::error::{ReaderError, ReaderResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of delivered lines between checkpoint saves
pub const DEFAULT_SAVE_EVERY: u64 = 10;

/// Default suffix replacing the source file's final extension
pub const DEFAULT_CHECKPOINT_SUFFIX: &str = "settings.json";

/// Default read buffer size in bytes
pub const DEFAULT_BUFFER_CAPACITY: usize = 8 * 1024;

/// Configuration options for a [`TextFileReader`](crate::TextFileReader)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Persist the checkpoint after every `save_every` delivered lines
    pub save_every: u64,

    /// Suffix of the sibling checkpoint file (`test.txt` -> `test.<suffix>`)
    pub checkpoint_suffix: String,

    /// Size of the read buffer in bytes
    pub buffer_capacity: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            save_every: DEFAULT_SAVE_EVERY,
            checkpoint_suffix: DEFAULT_CHECKPOINT_SUFFIX.to_string(),
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

/// Layout of a configuration file: the reader options live in `[reader]`
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    reader: ReaderConfig,
}

impl ReaderConfig {
    /// Creates a new builder for ReaderConfig
    pub fn builder() -> ReaderConfigBuilder {
        ReaderConfigBuilder::new()
    }

    /// Validates the configuration
    pub fn validate(&self) -> ReaderResult<()> {
        if self.save_every == 0 {
            return Err(ReaderError::InvalidConfig {
                reason: "save_every must be greater than 0".to_string(),
            });
        }

        let suffix = self.checkpoint_suffix.trim_matches('.');
        if suffix.is_empty() {
            return Err(ReaderError::InvalidConfig {
                reason: "checkpoint_suffix must not be empty".to_string(),
            });
        }
        if suffix.contains(['/', '\\']) {
            return Err(ReaderError::InvalidConfig {
                reason: format!("checkpoint_suffix must not contain a path separator: {suffix}"),
            });
        }

        if self.buffer_capacity == 0 {
            return Err(ReaderError::InvalidConfig {
                reason: "buffer_capacity must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Parses a TOML document with an optional `[reader]` table
    pub fn from_toml_str(content: &str) -> ReaderResult<Self> {
        let file: ConfigFile = toml::from_str(content).map_err(|e| ReaderError::InvalidConfig {
            reason: e.to_string(),
        })?;
        file.reader.validate()?;
        Ok(file.reader)
    }

    /// Loads and validates a TOML configuration file
    pub fn from_toml_file(path: &Path) -> ReaderResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ReaderError::InvalidConfig {
            reason: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }
}

/// Builder for ReaderConfig with fluent API
#[derive(Debug, Clone)]
pub struct ReaderConfigBuilder {
    config: ReaderConfig,
}

impl ReaderConfigBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            config: ReaderConfig::default(),
        }
    }

    /// Sets the save cadence in delivered lines
    pub fn save_every(mut self, lines: u64) -> Self {
        self.config.save_every = lines;
        self
    }

    /// Sets the checkpoint file suffix
    pub fn checkpoint_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.checkpoint_suffix = suffix.into();
        self
    }

    /// Sets the read buffer size
    pub fn buffer_capacity(mut self, bytes: usize) -> Self {
        self.config.buffer_capacity = bytes;
        self
    }

    /// Builds and validates the configuration
    pub fn build(self) -> ReaderResult<ReaderConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ReaderConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReaderConfig::default();
        assert_eq!(config.save_every, 10);
        assert_eq!(config.checkpoint_suffix, "settings.json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = ReaderConfig::builder()
            .save_every(3)
            .checkpoint_suffix("progress.json")
            .buffer_capacity(64)
            .build()
            .unwrap();

        assert_eq!(config.save_every, 3);
        assert_eq!(config.checkpoint_suffix, "progress.json");
        assert_eq!(config.buffer_capacity, 64);
    }

    #[test]
    fn test_zero_cadence_rejected() {
        let result = ReaderConfig::builder().save_every(0).build();
        assert!(matches!(result, Err(ReaderError::InvalidConfig { .. })));
    }

    #[test]
    fn test_bad_suffix_rejected() {
        assert!(ReaderConfig::builder().checkpoint_suffix("").build().is_err());
        assert!(ReaderConfig::builder().checkpoint_suffix("..").build().is_err());
        assert!(ReaderConfig::builder()
            .checkpoint_suffix("state/x.json")
            .build()
            .is_err());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = ReaderConfig::from_toml_str("[reader]\nsave_every = 25\n").unwrap();
        assert_eq!(config.save_every, 25);
        assert_eq!(config.checkpoint_suffix, DEFAULT_CHECKPOINT_SUFFIX);
    }

    #[test]
    fn test_from_toml_empty() {
        let config = ReaderConfig::from_toml_str("").unwrap();
        assert_eq!(config, ReaderConfig::default());
    }

    #[test]
    fn test_from_toml_invalid() {
        assert!(ReaderConfig::from_toml_str("[reader]\nsave_every = \"often\"\n").is_err());
        assert!(ReaderConfig::from_toml_str("[reader]\nsave_every = 0\n").is_err());
    }

    #[test]
    fn test_from_toml_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("linemark.toml");
        std::fs::write(&path, "[reader]\ncheckpoint_suffix = \"state.json\"\n").unwrap();

        let config = ReaderConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.checkpoint_suffix, "state.json");

        let missing = ReaderConfig::from_toml_file(&dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(ReaderError::InvalidConfig { .. })));
    }
}
