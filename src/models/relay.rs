//! Relay endpoint data models
//!
//! The JSON bodies exchanged between the card client and the relay.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/gemini`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptRequest {
    pub prompt: String,
}

/// Successful relay answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResponse {
    pub text: String,
}

/// Error body returned by the relay on any failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub response_type: String,
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(kind: &str, message: impl Into<String>) -> Self {
        Self {
            response_type: "error".to_string(),
            error: ErrorDetail {
                kind: kind.to_string(),
                message: message.into(),
            },
        }
    }
}

/// One entry of the topic catalogue as served by `GET /api/topics`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicEntry {
    pub title: String,
    pub summary: String,
    pub subject: String,
    pub prompt: String,
}

/// Body of `GET /api/topics`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicCatalogue {
    pub title: String,
    pub topics: Vec<TopicEntry>,
}
