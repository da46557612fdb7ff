//! HTTP client for the prompt relay
//!
//! Used by the card deck to turn a topic prompt into explanation text.

use crate::models::relay::{ErrorResponse, ModelResponse, PromptRequest};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Error types that can occur while calling the relay
#[derive(Debug, thiserror::Error)]
pub enum RelayClientError {
    #[error("Relay unreachable: {0}")]
    Transport(String),

    #[error("Relay returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Relay response could not be decoded: {0}")]
    Decode(String),
}

/// Source of explanation text for a prompt
#[async_trait]
pub trait PromptFetcher: Send + Sync {
    async fn fetch_text(&self, prompt: &str) -> Result<String, RelayClientError>;
}

/// Client for `POST /api/gemini`
pub struct RelayClient {
    client: Client,
    relay_url: String,
}

impl RelayClient {
    /// Create a new relay client
    ///
    /// # Arguments
    ///
    /// * `relay_url` - Full URL of the relay route
    /// * `timeout` - Request timeout in seconds
    pub fn new(relay_url: impl Into<String>, timeout: u64) -> Result<Self, RelayClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .map_err(|e| RelayClientError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            relay_url: relay_url.into(),
        })
    }

    pub fn relay_url(&self) -> &str {
        &self.relay_url
    }
}

#[async_trait]
impl PromptFetcher for RelayClient {
    async fn fetch_text(&self, prompt: &str) -> Result<String, RelayClientError> {
        let response = self
            .client
            .post(&self.relay_url)
            .json(&PromptRequest {
                prompt: prompt.to_string(),
            })
            .send()
            .await
            .map_err(|e| RelayClientError::Transport(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<ErrorResponse>(&error_text)
                .map(|e| format!("{} ({})", e.error.message, e.error.kind))
                .unwrap_or(error_text);
            return Err(RelayClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: ModelResponse = response
            .json()
            .await
            .map_err(|e| RelayClientError::Decode(e.to_string()))?;

        Ok(body.text)
    }
}
