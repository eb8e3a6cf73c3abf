//! Main entry point for Herald.

use anyhow::Context;
use clap::Parser;
use herald_bot::Herald;
use herald_common::init_logging;
use herald_config::ConfigLoader;
use std::path::PathBuf;
use tracing::{error, info};

/// Discord command router with permission levels, cooldowns and hot reload.
#[derive(Debug, Parser)]
#[command(name = "herald", version, about)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, env = "HERALD_CONFIG", default_value = "config.yaml")]
    config: PathBuf,

    /// Remove every registered application command and exit.
    #[arg(long)]
    clear_commands: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loader = ConfigLoader::new(&cli.config);
    let config = loader
        .load()
        .await
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
    let _logging = init_logging(&config.logging).context("failed to initialize logging")?;

    info!("Starting Herald v{}", env!("CARGO_PKG_VERSION"));

    let herald = Herald::build(config, loader).await?;

    if cli.clear_commands {
        herald.clear_commands().await?;
        info!("Application commands cleared");
        return Ok(());
    }

    if let Err(e) = herald.start().await {
        error!("Herald stopped: {e}");
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from(["herald", "--config", "/etc/herald.yaml", "--clear-commands"]);
        assert_eq!(cli.config, PathBuf::from("/etc/herald.yaml"));
        assert!(cli.clear_commands);
    }
}
