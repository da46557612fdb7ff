//! Relay error responses
//!
//! Maps every failure of the relay route onto a status code and a JSON
//! error body so callers never see an unstructured failure.

use crate::core::constants::error_kind;
use crate::core::provider::ProviderError;
use crate::models::relay::ErrorResponse;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Failure of a relay request
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Prompt must be a non-empty string")]
    EmptyPrompt,

    #[error("Prompt is {length} characters, limit is {limit}")]
    PromptTooLong { length: usize, limit: usize },

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MalformedBody(_) | RelayError::EmptyPrompt => StatusCode::BAD_REQUEST,
            RelayError::PromptTooLong { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::Provider(e) => match e {
                ProviderError::BadRequest(_) => StatusCode::BAD_REQUEST,
                ProviderError::RateLimit(_) => StatusCode::TOO_MANY_REQUESTS,
                ProviderError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                ProviderError::Authentication(_)
                | ProviderError::Network(_)
                | ProviderError::EmptyResponse(_)
                | ProviderError::ApiError { .. } => StatusCode::BAD_GATEWAY,
                ProviderError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::Provider(e) => e.kind(),
            _ => error_kind::MALFORMED_INPUT,
        }
    }
}

impl From<JsonRejection> for RelayError {
    fn from(rejection: JsonRejection) -> Self {
        RelayError::MalformedBody(rejection.body_text())
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let body = ErrorResponse::new(self.kind(), self.to_string());
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(RelayError::EmptyPrompt.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            RelayError::PromptTooLong {
                length: 10,
                limit: 5
            }
            .status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            RelayError::from(ProviderError::Timeout(3)).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            RelayError::from(ProviderError::Authentication("bad key".into())).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            RelayError::from(ProviderError::RateLimit("slow down".into())).status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_kind_for_local_validation() {
        assert_eq!(RelayError::EmptyPrompt.kind(), "malformed_input");
        assert_eq!(
            RelayError::MalformedBody("missing field `prompt`".into()).kind(),
            "malformed_input"
        );
    }
}
