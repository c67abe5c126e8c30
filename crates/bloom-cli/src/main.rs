use clap::Parser;
use tracing_subscriber::EnvFilter;

use bloom_cli::cli::Cli;
use bloom_cli::commands;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays parseable with --format json
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if cli.json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    commands::run(cli.command, cli.config.as_deref()).await
}
