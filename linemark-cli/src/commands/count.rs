//! Count command implementation

use super::InputArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use anyhow::Context;
use clap::Args;

/// Arguments for the count command
#[derive(Debug, Args)]
pub struct CountArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

impl CountArgs {
    /// Execute the count command
    pub async fn execute(&self, config: &CliConfig) -> CliResult<()> {
        let reader = self.input.open_reader(config)?;
        let total = reader
            .count_lines()
            .await
            .with_context(|| format!("Failed to count lines of {}", self.input.input.display()))?;

        println!("{total}");
        Ok(())
    }
}
