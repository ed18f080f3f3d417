//! Command-line entry point for linemark

use linemark_cli::CliResult;
use clap::Parser;
use linemark_cli::commands::{Commands, GlobalOptions};

/// Read large text files line by line and resume where you left off
#[derive(Debug, Parser)]
#[command(name = "linemark", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(&cli.global);

    log::debug!("Arguments: {:?}", cli);
    cli.command.execute(&cli.global).await
}

/// Initialize logging based on verbosity level
fn init_logging(global: &GlobalOptions) {
    if global.quiet {
        return;
    }

    let log_level = match global.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}
