//! Reset command implementation

use super::InputArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use anyhow::Context;
use clap::Args;

/// Arguments for the reset command
#[derive(Debug, Args)]
pub struct ResetArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

impl ResetArgs {
    /// Execute the reset command
    pub fn execute(&self, config: &CliConfig) -> CliResult<()> {
        let reader = self.input.open_reader(config)?;
        reader
            .reset_checkpoint()
            .context("Failed to reset checkpoint")?;

        println!(
            "Checkpoint reset: {}",
            reader.checkpoint_path()?.display()
        );
        Ok(())
    }
}
