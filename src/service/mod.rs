//! Answering service abstraction
//!
//! The answering service is the external collaborator that maps a question
//! to an answer string. The send pipeline only talks to it through the
//! [`AnsweringService`] trait so it can be exercised without a network.

pub mod http;

pub use http::{AskRequest, AskResponse, HttpAnsweringService};

use crate::config::ServiceConfig;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Remote question/answer exchange
#[async_trait]
pub trait AnsweringService: Send + Sync {
    /// Send one question and return the answer text
    ///
    /// An empty string means the service succeeded without producing an
    /// answer; the caller decides how to present that.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-success status, or a body
    /// that cannot be parsed
    async fn ask(&self, question: &str) -> Result<String>;

    /// Report the service's health status line
    ///
    /// # Default Implementation
    ///
    /// Returns an error stating that health checks are not supported.
    async fn health(&self) -> Result<String> {
        Err(crate::error::MedaiError::Service(
            "Health checks are not supported by this service".to_string(),
        )
        .into())
    }
}

/// Build the HTTP answering service described by `config`
///
/// # Errors
///
/// Returns error if the endpoint is not a valid URL or the HTTP client
/// cannot be constructed
pub fn create_service(config: &ServiceConfig) -> Result<Arc<dyn AnsweringService>> {
    Ok(Arc::new(HttpAnsweringService::new(config.clone())?))
}
