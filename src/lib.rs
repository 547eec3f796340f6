//! MedAI - terminal chat client for a medical question answering service
//!
//! This library provides the core functionality of the MedAI client: an
//! immutable conversation store, the send pipeline that runs one
//! question/answer exchange, the HTTP answering service, and the terminal
//! presentation.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `conversation`: Conversation and message types, store snapshots
//! - `pipeline`: Send pipeline and its busy state
//! - `service`: Answering service abstraction and HTTP implementation
//! - `session`: Ties store, draft and pipeline together; publishes snapshots
//! - `view`: Terminal rendering of snapshots
//! - `commands`: CLI command handlers
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `logging`: Tracing subscriber setup
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use medai::{ChatSession, Config};
//! use medai::service::create_service;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let session = ChatSession::new(create_service(&config.service)?);
//!     session.send("What is the treatment of acne?").await;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod conversation;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod service;
pub mod session;
pub mod view;

// Re-export commonly used types
pub use config::Config;
pub use conversation::{Conversation, ConversationId, ConversationStore, Message, MessageStatus};
pub use error::{MedaiError, Result};
pub use pipeline::{PipelineState, SendOutcome};
pub use service::{AnsweringService, HttpAnsweringService};
pub use session::ChatSession;

#[cfg(test)]
pub mod test_utils;
