//! MedAI - terminal chat client for a medical question answering service
//!
#![doc = "Main entry point for the MedAI application."]

use anyhow::Result;

use medai::cli::{Cli, Commands};
use medai::commands;
use medai::config::Config;
use medai::logging::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose, cli.json_logs)?;

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat => {
            tracing::info!("Starting interactive chat mode");
            tracing::debug!("Using endpoint: {}", config.service.endpoint);
            commands::chat::run_chat(config).await?;
            Ok(())
        }
        Commands::Ask { question, json } => {
            let question = question.join(" ");
            tracing::info!("Starting one-shot question");
            tracing::debug!("Question: {}", question);
            commands::ask::run_ask(config, question, json).await?;
            Ok(())
        }
        Commands::Status => {
            tracing::info!("Starting health check");
            commands::status::run_status(config).await?;
            Ok(())
        }
    }
}
