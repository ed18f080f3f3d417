//! CLI command implementations

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use clap::{Args, Subcommand};
use linemark_core::{ReaderError, TextFileReader};
use std::path::PathBuf;

pub mod count;
pub mod read;
pub mod reset;
pub mod status;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print lines from the checkpoint onwards and advance the checkpoint
    Read(read::ReadArgs),

    /// Print the number of lines in a file
    Count(count::CountArgs),

    /// Reset the checkpoint so the next read starts at line 1
    Reset(reset::ResetArgs),

    /// Show the checkpoint of a file
    Status(status::StatusArgs),
}

/// Options shared by every command
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Save the checkpoint every N delivered lines
    #[arg(long, value_name = "N", global = true)]
    pub save_every: Option<u64>,

    /// Suppress progress and log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// The file a command operates on
#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Input file
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,
}

impl InputArgs {
    /// Open a reader on the input file
    pub fn open_reader(&self, config: &CliConfig) -> CliResult<TextFileReader> {
        let mut reader = TextFileReader::with_config(config.reader.clone())
            .map_err(|e| CliError::ConfigError(e.to_string()))?;

        reader.open(&self.input).map_err(|e| match e {
            ReaderError::NotFound { path, .. } => {
                anyhow::Error::new(CliError::FileNotFound(path.display().to_string()))
            }
            other => anyhow::Error::new(other),
        })?;

        log::debug!(
            "Opened {} (checkpoint: {})",
            self.input.display(),
            reader.checkpoint_path()?.display()
        );
        Ok(reader)
    }
}

impl Commands {
    /// Execute the selected command
    pub async fn execute(&self, global: &GlobalOptions) -> CliResult<()> {
        let config =
            CliConfig::load(global.config.as_deref())?.with_save_every(global.save_every)?;
        log::debug!("Configuration: {:?}", config);

        match self {
            Commands::Read(args) => args.execute(&config, global.quiet).await,
            Commands::Count(args) => args.execute(&config).await,
            Commands::Reset(args) => args.execute(&config),
            Commands::Status(args) => args.execute(&config).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_open_reader_missing_file() {
        let input = InputArgs {
            input: PathBuf::from("/nonexistent/file.txt"),
        };
        let err = input.open_reader(&CliConfig::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_open_reader_uses_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("input.txt");
        fs::write(&path, "a\nb\n").unwrap();

        let mut config = CliConfig::default();
        config.reader.checkpoint_suffix = "state.json".to_string();
        let input = InputArgs { input: path };

        let reader = input.open_reader(&config).unwrap();
        assert_eq!(
            reader.checkpoint_path().unwrap(),
            dir.path().join("input.state.json")
        );
    }

    #[test]
    fn test_commands_debug_format() {
        let cmd = Commands::Count(count::CountArgs {
            input: InputArgs {
                input: PathBuf::from("test.txt"),
            },
        });
        let debug_str = format!("{:?}", cmd);
        assert!(debug_str.contains("Count"));
        assert!(debug_str.contains("test.txt"));
    }
}
