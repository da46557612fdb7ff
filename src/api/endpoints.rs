//! API endpoint handlers
//!
//! This module implements the HTTP endpoints of the relay: the prompt relay
//! itself, the topic catalogue, and the service and health checks.

use crate::api::error::RelayError;
use crate::core::config::Config;
use crate::core::constants::route;
use crate::core::provider::{Provider, ProviderError};
use crate::core::topics;
use crate::models::relay::{ModelResponse, PromptRequest};
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub provider: Arc<dyn Provider>,
}

/// Create the API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route(route::RELAY, post(relay_prompt))
        .route(route::TOPICS, get(list_topics))
        .route(route::HEALTH, get(health_check))
        .route(route::TEST_CONNECTION, get(test_connection))
        .with_state(state)
}

/// Reject prompts that cannot produce a meaningful answer
fn validate_prompt(prompt: &str, max_chars: Option<usize>) -> Result<(), RelayError> {
    if prompt.trim().is_empty() {
        return Err(RelayError::EmptyPrompt);
    }
    if let Some(limit) = max_chars {
        let length = prompt.chars().count();
        if length > limit {
            return Err(RelayError::PromptTooLong { length, limit });
        }
    }
    Ok(())
}

/// Call the provider, bounded by the configured request timeout
async fn generate_with_timeout(state: &AppState, prompt: &str) -> Result<String, ProviderError> {
    let timeout = state.config.request_timeout;
    match tokio::time::timeout(
        Duration::from_secs(timeout),
        state.provider.generate_text(prompt),
    )
    .await
    {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout(timeout)),
    }
}

/// POST /api/gemini - Relay a prompt to the provider
async fn relay_prompt(
    State(state): State<AppState>,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> Result<Json<ModelResponse>, RelayError> {
    let request_id = uuid::Uuid::new_v4();

    let Json(request) = payload.inspect_err(|rejection| {
        warn!(%request_id, "Rejected relay body: {}", rejection.body_text());
    })?;

    validate_prompt(&request.prompt, state.config.max_prompt_chars).inspect_err(|e| {
        warn!(%request_id, "Rejected prompt: {}", e);
    })?;

    info!(
        %request_id,
        "📥 Relaying prompt: provider={}, model={}, chars={}",
        state.provider.provider_name(),
        state.provider.model(),
        request.prompt.chars().count()
    );
    debug!(%request_id, "Prompt: {:?}", request.prompt);

    let started = Instant::now();
    match generate_with_timeout(&state, &request.prompt).await {
        Ok(text) => {
            info!(
                %request_id,
                "📤 Relay completed in {:?}, {} chars",
                started.elapsed(),
                text.chars().count()
            );
            Ok(Json(ModelResponse { text }))
        }
        Err(e) => {
            error!(
                %request_id,
                kind = e.kind(),
                "Provider API error after {:?}: {}",
                started.elapsed(),
                e
            );
            Err(e.into())
        }
    }
}

/// GET /api/topics - The documentation catalogue with per-topic prompts
async fn list_topics() -> impl IntoResponse {
    Json(topics::catalogue())
}

/// GET / - Root endpoint
async fn root(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "message": format!("{} relay v{}", topics::HUB_TITLE, env!("CARGO_PKG_VERSION")),
        "status": "running",
        "config": {
            "provider": state.provider.provider_name(),
            "model": state.provider.model(),
            "request_timeout": state.config.request_timeout,
            "max_prompt_chars": state.config.max_prompt_chars,
        },
        "endpoints": {
            "relay": route::RELAY,
            "topics": route::TOPICS,
            "health": route::HEALTH,
            "test_connection": route::TEST_CONNECTION,
        },
    }))
}

/// GET /health - Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "provider": state.provider.provider_name(),
        "model": state.provider.model(),
        "credentials_configured": state.config.validate_api_key(),
    }))
}

/// GET /test-connection - Test provider connectivity
async fn test_connection(State(state): State<AppState>) -> impl IntoResponse {
    match generate_with_timeout(&state, "Hello").await {
        Ok(_) => Json(json!({
            "status": "success",
            "message": format!("Successfully connected to {} API", state.provider.provider_name()),
            "provider": state.provider.provider_name(),
            "model_used": state.provider.model(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
        Err(e) => {
            error!("API connectivity test failed: {}", e);
            Json(json!({
                "status": "failed",
                "error_type": e.kind(),
                "message": e.to_string(),
                "provider": state.provider.provider_name(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "suggestions": [
                    "Check your API key is valid",
                    "Verify the model name is available to your project",
                    "Check if you have reached rate limits",
                ],
            }))
        }
    }
}
