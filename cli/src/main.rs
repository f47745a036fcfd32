//! CLI entrypoint for scholar
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod args;
mod commands;

use anyhow::Result;
use args::{Cli, Command};
use clap::Parser;
use scholar_infrastructure::ConfigLoader;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting scholar");

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?
    };
    config.validate()?;

    let ctx = commands::AppContext::build(config).await?;

    match cli.command {
        Command::Chat {
            name,
            persona,
            model,
        } => commands::chat::run(&ctx, &name, &persona, model.as_deref()).await,
        Command::Meeting { topic, auto_rounds } => {
            commands::meeting::run(&ctx, &topic, auto_rounds).await
        }
        Command::Focus { topic, file } => {
            commands::focus::run(&ctx, &topic, file.as_deref()).await
        }
        Command::Sessions { command } => commands::sessions::run(&ctx, command).await,
    }
}
