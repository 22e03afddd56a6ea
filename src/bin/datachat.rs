use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use color_eyre::Result;
use tracing::error;

use datachat::app::App;
use datachat::config::Config;

/// Terminal chat client for querying tabular datasets.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable file logging at the given level (overrides RUST_LOG)
    #[arg(long = "logging", value_enum)]
    logging: Option<LogLevel>,
    /// Path to a config file (overrides default config discovery)
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf>,
    /// Base address of the dataset query service (overrides config)
    #[arg(long = "base-url", value_name = "URL")]
    base_url: Option<String>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging to file in current working directory
    let cwd = std::env::current_dir()?;
    let log_path = cwd.join("datachat.log");
    let level = match args.logging {
        Some(LogLevel::Error) => Some(tracing::Level::ERROR),
        Some(LogLevel::Warn) => Some(tracing::Level::WARN),
        Some(LogLevel::Info) => Some(tracing::Level::INFO),
        Some(LogLevel::Debug) => Some(tracing::Level::DEBUG),
        Some(LogLevel::Trace) => Some(tracing::Level::TRACE),
        None => Some(tracing::Level::WARN),
    };
    datachat::logging::init_with(Some(log_path), level)?;
    datachat::errors::init()?;

    let mut config = match Config::from_path(args.config.as_ref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("failed to load config, using embedded defaults: {e}");
            Config::embedded()
        }
    };
    if let Some(base_url) = args.base_url {
        config.config.base_url = base_url;
    }

    let mut app = App::new(config)?;
    if let Err(e) = app.run().await {
        error!("Error: {e}");
        return Err(e);
    }
    Ok(())
}
