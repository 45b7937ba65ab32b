//! Model Monitor - Main Entry Point
//!
//! Charts a model's logged accuracy and scans the log for high-error observations.

use clap::Parser;
use model_monitor::cli::{Cli, Commands, cmd_chart, cmd_info, cmd_interactive, cmd_scan, load_config};
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "model_monitor=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Chart { data, json }) => {
            cmd_chart(config, &data, json.as_deref()).await?;
        }
        Some(Commands::Scan { data, model, threshold, parallel, json }) => {
            cmd_scan(config, &data, &model, threshold, parallel, json).await?;
        }
        Some(Commands::Info { data }) => {
            cmd_info(config, &data).await?;
        }
        Some(Commands::Interactive { data, reload, model }) => {
            cmd_interactive(config, &data, &reload, model.as_deref()).await?;
        }
        None => {
            // Default: interactive mode over data.csv / new_data.csv
            cmd_interactive(config, Path::new("data.csv"), Path::new("new_data.csv"), None).await?;
        }
    }

    Ok(())
}
