//! HTTP implementation of the answering service
//!
//! Wire contract:
//!
//! - `POST <endpoint>` with body `{"question": "..."}`
//! - success body carries the answer in `answer`; older deployments reply
//!   with `response` instead, which is accepted when `answer` is missing or
//!   empty
//! - `GET <health_url>` returns `{"status": "..."}`

use crate::config::ServiceConfig;
use crate::error::{MedaiError, Result};
use crate::service::AnsweringService;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Request body sent to the answering endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AskRequest {
    /// The trimmed user question
    pub question: String,
}

/// Success body returned by the answering endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AskResponse {
    /// Canonical answer field
    #[serde(default)]
    pub answer: Option<String>,

    /// Legacy answer field, only consulted when `answer` is empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

impl AskResponse {
    /// Collapse the two answer fields into one string
    ///
    /// # Examples
    ///
    /// ```
    /// use medai::service::AskResponse;
    ///
    /// let body: AskResponse = serde_json::from_str(r#"{"response": "Rest and fluids."}"#).unwrap();
    /// assert_eq!(body.into_answer(), "Rest and fluids.");
    ///
    /// let body: AskResponse = serde_json::from_str("{}").unwrap();
    /// assert_eq!(body.into_answer(), "");
    /// ```
    pub fn into_answer(self) -> String {
        match self.answer {
            Some(answer) if !answer.is_empty() => answer,
            _ => {
                if self.response.is_some() {
                    tracing::debug!("Using legacy `response` field from answering service");
                }
                self.response.unwrap_or_default()
            }
        }
    }
}

/// Body returned by the health endpoint
#[derive(Debug, Deserialize)]
struct HealthResponse {
    #[serde(default)]
    status: Option<String>,
}

/// Answering service reached over HTTP with JSON bodies
///
/// # Examples
///
/// ```
/// use medai::config::ServiceConfig;
/// use medai::service::HttpAnsweringService;
///
/// let service = HttpAnsweringService::new(ServiceConfig::default()).unwrap();
/// assert_eq!(service.endpoint().as_str(), "http://localhost:8000/chat");
/// assert_eq!(service.health_url().as_str(), "http://localhost:8000/");
/// ```
pub struct HttpAnsweringService {
    client: Client,
    endpoint: Url,
    health_url: Url,
}

impl HttpAnsweringService {
    /// Create a new HTTP answering service
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint or health URL cannot be parsed, or if
    /// the HTTP client cannot be built
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            MedaiError::Config(format!("Invalid endpoint {}: {}", config.endpoint, e))
        })?;

        let health_url = match &config.health_url {
            Some(url) => Url::parse(url)
                .map_err(|e| MedaiError::Config(format!("Invalid health URL {}: {}", url, e)))?,
            None => endpoint.join("/")?,
        };

        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder
            .build()
            .map_err(|e| MedaiError::Service(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized answering service: endpoint={}, timeout={:?}",
            endpoint,
            config.timeout_seconds
        );

        Ok(Self {
            client,
            endpoint,
            health_url,
        })
    }

    /// The answering endpoint
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The health check URL
    pub fn health_url(&self) -> &Url {
        &self.health_url
    }
}

#[async_trait]
impl AnsweringService for HttpAnsweringService {
    async fn ask(&self, question: &str) -> Result<String> {
        let request = AskRequest {
            question: question.to_string(),
        };

        tracing::debug!("Sending question to {}", self.endpoint);

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Failed to reach answering service: {}", e);
                MedaiError::Service(format!("Failed to reach answering service: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Answering service returned error {}: {}", status, body);
            return Err(MedaiError::ServiceStatus {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let body = response.text().await.map_err(|e| {
            MedaiError::Service(format!("Failed to read answering service response: {}", e))
        })?;
        let parsed: AskResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse answering service response: {}", e);
            MedaiError::Service(format!("Failed to parse answering service response: {}", e))
        })?;

        let answer = parsed.into_answer();
        tracing::debug!("Received answer ({} chars)", answer.chars().count());
        Ok(answer)
    }

    async fn health(&self) -> Result<String> {
        let response = self
            .client
            .get(self.health_url.clone())
            .send()
            .await
            .map_err(|e| MedaiError::Service(format!("Failed to reach answering service: {}", e)))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(MedaiError::ServiceStatus {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        match serde_json::from_str::<HealthResponse>(&body) {
            Ok(HealthResponse {
                status: Some(status),
            }) => Ok(status),
            _ => Ok(body.trim().to_string()),
        }
    }
}
