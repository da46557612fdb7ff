//! Provider abstraction layer for text-generation backends
//!
//! The relay only needs one capability from a backend: turn a prompt into
//! text. Both Gemini flavours (Generative Language API and Vertex AI)
//! implement this trait and are injected into the router at startup.

use crate::core::constants::error_kind;
use async_trait::async_trait;
use thiserror::Error;

/// Error types for provider operations
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider did not answer within {0}s")]
    Timeout(u64),

    #[error("Provider returned no text: {0}")]
    EmptyResponse(String),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ProviderError {
    /// Stable identifier used in error bodies and logs
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Authentication(_) => error_kind::AUTHENTICATION,
            ProviderError::RateLimit(_) => error_kind::RATE_LIMIT,
            ProviderError::BadRequest(_) => error_kind::MALFORMED_INPUT,
            ProviderError::Network(_) => error_kind::NETWORK,
            ProviderError::Timeout(_) => error_kind::TIMEOUT,
            ProviderError::EmptyResponse(_) => error_kind::EMPTY_RESPONSE,
            ProviderError::ApiError { .. } => error_kind::API_ERROR,
            ProviderError::Unexpected(_) => error_kind::INTERNAL,
        }
    }

    /// Classify a transport-level failure from reqwest
    pub fn from_transport(error: reqwest::Error, timeout_secs: u64) -> Self {
        if error.is_timeout() {
            ProviderError::Timeout(timeout_secs)
        } else if error.is_decode() {
            ProviderError::Unexpected(format!("Failed to parse response: {}", error))
        } else {
            ProviderError::Network(error.to_string())
        }
    }
}

/// Trait for text-generation providers
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate text for a single user prompt with default generation settings
    async fn generate_text(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Model identifier sent upstream
    fn model(&self) -> &str;

    /// Get the provider name
    fn provider_name(&self) -> &str;
}

/// Supported provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    Gemini,
    VertexAI,
}

impl ProviderType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" | "genai" => Some(ProviderType::Gemini),
            "vertexai" | "vertex-ai" | "vertex_ai" => Some(ProviderType::VertexAI),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider_type() {
        assert_eq!(ProviderType::parse("Gemini"), Some(ProviderType::Gemini));
        assert_eq!(ProviderType::parse("vertex-ai"), Some(ProviderType::VertexAI));
        assert_eq!(ProviderType::parse("openai"), None);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(ProviderError::Timeout(5).kind(), "timeout");
        assert_eq!(
            ProviderError::BadRequest("x".into()).kind(),
            "malformed_input"
        );
        assert_eq!(
            ProviderError::ApiError {
                status: 503,
                message: "down".into()
            }
            .kind(),
            "api_error"
        );
    }
}
