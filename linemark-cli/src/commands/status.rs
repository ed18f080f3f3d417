//! Status command implementation

use super::InputArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use clap::Args;

/// Arguments for the status command
#[derive(Debug, Args)]
pub struct StatusArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config: &CliConfig) -> CliResult<()> {
        let reader = self.input.open_reader(config)?;
        let checkpoint = reader.checkpoint()?;
        let total = reader.count_lines().await?;

        println!("File:       {}", reader.path()?.display());
        println!("Checkpoint: {}", reader.checkpoint_path()?.display());
        println!("Processed:  {} of {} lines", checkpoint.line.min(total), total);
        println!("Remaining:  {}", total.saturating_sub(checkpoint.line));
        Ok(())
    }
}
