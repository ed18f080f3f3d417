//! Read command implementation

use super::InputArgs;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{create_formatter, OutputFormat};
use crate::progress::ProgressReporter;
use anyhow::Context;
use clap::Args;
use linemark_core::SessionEnd;
use std::future::ready;
use std::io::{self, LineWriter};

/// Arguments for the read command
#[derive(Debug, Args)]
pub struct ReadArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Stop after delivering this many lines
    #[arg(short = 'n', long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub limit: Option<u64>,

    /// Output format (defaults to the configured one)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Show a progress bar on stderr
    #[arg(long)]
    pub progress: bool,
}

impl ReadArgs {
    /// Execute the read command
    pub async fn execute(&self, config: &CliConfig, quiet: bool) -> CliResult<()> {
        let reader = self.input.open_reader(config)?;
        let format = self.format.unwrap_or(config.output.default_format);

        let mut progress = ProgressReporter::new(quiet || !self.progress);
        if self.progress && !quiet {
            let total = reader.count_lines().await?;
            progress.init_lines(total, reader.checkpoint()?.line);
        }

        // Ctrl-C ends the session the same way as reaching the limit
        let stop = reader.stop_handle();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::info!("Interrupted, saving checkpoint");
                stop.stop();
            }
        });

        // Each line reaches stdout before it counts as processed
        let mut formatter = create_formatter(format, LineWriter::new(io::stdout()));
        let mut delivered = 0u64;
        let reader = &reader;

        let summary = reader
            .try_read(|line, number| {
                if let Err(e) = formatter.format_line(number, &line) {
                    return ready(Err(CliError::OutputError(format!("{e:#}"))));
                }
                progress.line_completed(number);

                delivered += 1;
                if self.limit.is_some_and(|limit| delivered >= limit) {
                    reader.stop();
                }
                ready(Ok(()))
            })
            .await
            .with_context(|| format!("Failed to read {}", self.input.input.display()))?;

        formatter.finish()?;

        let message = match summary.end {
            SessionEnd::Exhausted => "end of file",
            SessionEnd::Stopped => "stopped",
        };
        progress.finish(message);
        log::info!(
            "Delivered {} lines, skipped {}, checkpoint at {} ({})",
            summary.delivered,
            summary.skipped,
            summary.checkpoint.line,
            message
        );

        Ok(())
    }
}
