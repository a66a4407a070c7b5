// pfa-access - enrollment access core for Physics Fighter Academy

mod cli;

use clap::Parser;
use pfa_access::config::Config;
use pfa_access::error::Result;
use std::fs::{self, OpenOptions};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    init_tracing(args.verbose, args.command.is_live())?;
    cli::execute(args).await
}

/// Live commands own stdout, so they log to a file in the configured cache dir
fn init_tracing(verbose: bool, live: bool) -> Result<()> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()));

    if !live {
        subscriber.with_writer(std::io::stderr).init();
        return Ok(());
    }

    let log_path = Config::load()?.log_file_path()?;
    if let Some(dir) = log_path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&log_path)?;

    subscriber
        .with_writer(file.with_max_level(tracing::Level::TRACE))
        .with_ansi(false)
        .init();
    tracing::debug!("Logging to {}", log_path.display());

    Ok(())
}
