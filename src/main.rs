mod auth;
mod cli;
mod dashboard;
mod error;
mod models;
mod providers;
mod stats;

use std::io::ErrorKind;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::{debug, info, warn, Level};

#[tokio::main]
async fn main() -> Result<()> {
    // Environment from .env must be in place before clap reads it
    let dotenv = dotenvy::dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log_dotenv_outcome(dotenv);

    let cli = Cli::parse();
    info!("Starting repository dashboard");
    cli.execute().await?;

    Ok(())
}

/// Reports how loading the `.env` file went and returns the level it was logged at.
fn log_dotenv_outcome<T>(outcome: dotenvy::Result<T>) -> Level {
    match outcome {
        Ok(_) => {
            debug!("Loaded environment from .env file");
            Level::Debug
        }
        Err(dotenvy::Error::Io(e)) if e.kind() == ErrorKind::NotFound => {
            info!("No .env file found, using system environment variables");
            Level::Info
        }
        Err(e) => {
            warn!("Ignoring unreadable .env file: {e}");
            Level::Warn
        }
    }
}
