//! Command-line interface definition for MedAI
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat, one-shot questions, and
//! service health checks.

use clap::{Parser, Subcommand};

/// MedAI - terminal chat client for a medical question answering service
///
/// Ask questions, keep several conversation threads, and read answers
/// from the configured answering service.
#[derive(Parser, Debug, Clone)]
#[command(name = "medai")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Override the answering service endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for MedAI
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat,

    /// Ask a single question and print the answer
    Ask {
        /// The question to send
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,

        /// Print the resulting conversation as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that the answering service is reachable
    Status,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_chat_command() {
        let cli = Cli::try_parse_from(["medai", "chat"]).unwrap();
        assert!(matches!(cli.command, Commands::Chat));
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parse_ask_joins_words() {
        let cli = Cli::try_parse_from(["medai", "ask", "How", "is", "pneumonia", "diagnosed?"])
            .unwrap();
        if let Commands::Ask { question, json } = cli.command {
            assert_eq!(question.join(" "), "How is pneumonia diagnosed?");
            assert!(!json);
        } else {
            panic!("Expected Ask command");
        }
    }

    #[test]
    fn test_cli_parse_ask_with_json() {
        let cli = Cli::try_parse_from(["medai", "ask", "--json", "What is acne?"]).unwrap();
        if let Commands::Ask { question, json } = cli.command {
            assert_eq!(question, vec!["What is acne?".to_string()]);
            assert!(json);
        } else {
            panic!("Expected Ask command");
        }
    }

    #[test]
    fn test_cli_parse_ask_requires_question() {
        assert!(Cli::try_parse_from(["medai", "ask"]).is_err());
    }

    #[test]
    fn test_cli_parse_global_options() {
        let cli = Cli::try_parse_from([
            "medai",
            "--verbose",
            "--config",
            "custom.yaml",
            "--endpoint",
            "http://example.com/chat",
            "status",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some("custom.yaml".to_string()));
        assert_eq!(cli.endpoint, Some("http://example.com/chat".to_string()));
        assert!(matches!(cli.command, Commands::Status));
    }

    #[test]
    fn test_cli_json_logs_flag() {
        let cli = Cli::try_parse_from(["medai", "status"]).unwrap();
        assert!(!cli.json_logs);

        let cli = Cli::try_parse_from(["medai", "ask", "--json-logs", "hi"]).unwrap();
        assert!(cli.json_logs);
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["medai"]).is_err());
    }
}
