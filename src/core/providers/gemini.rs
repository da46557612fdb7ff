//! Gemini (Generative Language API) provider implementation

use crate::core::constants::provider::GEMINI_BASE_URL;
use crate::core::provider::{Provider, ProviderError};
use crate::models::gemini::{GenerateContentRequest, GenerateContentResponse, GoogleErrorEnvelope};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use tracing::{debug, warn};

/// Setting named in credential error hints
const CREDENTIAL_SETTING: &str = "GEMINI_API_KEY";

/// Provider for Google's Generative Language API, authenticated by API key
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    timeout: u64,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// # Arguments
    ///
    /// * `api_key` - Generative Language API key
    /// * `base_url` - API base URL (default: the public v1beta endpoint)
    /// * `model` - Model identifier, e.g. `gemini-2.5-flash`
    /// * `timeout` - Request timeout in seconds
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        model: String,
        timeout: u64,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_http_client(timeout)?,
            api_key,
            base_url: base_url
                .unwrap_or_else(|| GEMINI_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model,
            timeout,
        })
    }

    fn endpoint_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn generate_text(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = self
            .client
            .post(self.endpoint_url())
            .header("x-goog-api-key", &self.api_key);
        generate_content(request, prompt, self.timeout, CREDENTIAL_SETTING).await
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &str {
        "Gemini"
    }
}

/// Build the shared reqwest client with the configured timeout
pub(crate) fn build_http_client(timeout: u64) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout))
        .build()
        .map_err(|e| ProviderError::Unexpected(format!("Failed to create HTTP client: {}", e)))
}

/// Send a `generateContent` call and extract the generated text
///
/// `request` already carries URL and credentials; the body is added here.
/// `credential_setting` names the setting to fix when credentials are rejected.
pub(crate) async fn generate_content(
    request: RequestBuilder,
    prompt: &str,
    timeout: u64,
    credential_setting: &str,
) -> Result<String, ProviderError> {
    let body = GenerateContentRequest::from_prompt(prompt);

    let response = request
        .json(&body)
        .send()
        .await
        .map_err(|e| ProviderError::from_transport(e, timeout))?;

    let status = response.status();

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let error = classify_status(status.as_u16(), &error_text, credential_setting);
        warn!("Gemini API returned {}: {}", status, error);
        return Err(error);
    }

    let completion: GenerateContentResponse = response
        .json()
        .await
        .map_err(|e| ProviderError::from_transport(e, timeout))?;

    if let Some(usage) = &completion.usage_metadata {
        debug!(
            "Token usage: prompt={}, candidates={}, total={}",
            usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
        );
    }

    completion
        .text()
        .ok_or_else(|| ProviderError::EmptyResponse(completion.missing_text_reason()))
}

/// Map a non-success upstream status and body to a provider error
pub(crate) fn classify_status(
    status: u16,
    error_text: &str,
    credential_setting: &str,
) -> ProviderError {
    let (message, google_status) = match serde_json::from_str::<GoogleErrorEnvelope>(error_text) {
        Ok(envelope) => (envelope.error.message, envelope.error.status),
        Err(_) => (error_text.to_string(), String::new()),
    };
    let message = classify_error(&message, credential_setting);

    match (status, google_status.as_str()) {
        (401 | 403, _) | (_, "UNAUTHENTICATED" | "PERMISSION_DENIED") => {
            ProviderError::Authentication(message)
        }
        (429, _) | (_, "RESOURCE_EXHAUSTED") => ProviderError::RateLimit(message),
        (400, _) if is_credential_message(error_text) => ProviderError::Authentication(message),
        (400 | 404, _) => ProviderError::BadRequest(message),
        _ => ProviderError::ApiError { status, message },
    }
}

fn is_credential_message(error_text: &str) -> bool {
    let lower = error_text.to_lowercase();
    lower.contains("api_key_invalid") || lower.contains("api key not valid")
}

/// Classify Gemini errors and provide helpful messages
fn classify_error(error_detail: &str, credential_setting: &str) -> String {
    let error_lower = error_detail.to_lowercase();

    if error_lower.contains("api key not valid")
        || error_lower.contains("api_key_invalid")
        || error_lower.contains("invalid authentication credentials")
    {
        return format!(
            "Invalid credentials. Please check your {} configuration.",
            credential_setting
        );
    }

    if error_lower.contains("quota") || error_lower.contains("resource_exhausted") {
        return "Rate limit or quota exceeded. Please wait and try again.".to_string();
    }

    if error_lower.contains("location is not supported")
        || error_lower.contains("user location")
    {
        return "Gemini API is not available in your region.".to_string();
    }

    if error_lower.contains("models/") && error_lower.contains("not found") {
        return "Model not found. Please check the [model] name configuration.".to_string();
    }

    error_detail.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::HeaderMap, http::StatusCode, routing::post};
    use crate::api::endpoints::tests::{spawn_relay, test_config};
    use crate::models::relay::ErrorResponse;
    use serde_json::{Value, json};
    use std::sync::Arc;

    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/v1beta", addr)
    }

    #[test]
    fn test_classify_auth_error() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        match classify_status(400, body, "GEMINI_API_KEY") {
            ProviderError::Authentication(msg) => assert!(msg.contains("GEMINI_API_KEY")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_classify_statuses() {
        assert!(matches!(
            classify_status(429, "RESOURCE_EXHAUSTED", "GEMINI_API_KEY"),
            ProviderError::RateLimit(_)
        ));
        assert!(matches!(
            classify_status(
                400,
                r#"{"error":{"message":"Invalid JSON payload"}}"#,
                "GEMINI_API_KEY"
            ),
            ProviderError::BadRequest(_)
        ));
        assert!(matches!(
            classify_status(403, "denied", "GEMINI_API_KEY"),
            ProviderError::Authentication(_)
        ));
        assert!(matches!(
            classify_status(503, "overloaded", "GEMINI_API_KEY"),
            ProviderError::ApiError { status: 503, .. }
        ));
        assert!(matches!(
            classify_status(
                500,
                r#"{"error":{"code":500,"message":"Resource has been exhausted","status":"RESOURCE_EXHAUSTED"}}"#,
                "GEMINI_API_KEY"
            ),
            ProviderError::RateLimit(_)
        ));
    }

    #[tokio::test]
    async fn test_generate_text_against_mock_upstream() {
        let router = Router::new().route(
            "/v1beta/models/gemini-2.5-flash:generateContent",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers.get("x-goog-api-key").unwrap(), "test-key");
                assert_eq!(body["contents"][0]["parts"][0]["text"], "Explain rank");
                Json(json!({
                    "candidates": [{"content": {"role": "model", "parts": [{"text": "Rank counts pivots."}]}}]
                }))
            }),
        );
        let base_url = spawn_upstream(router).await;

        let provider = GeminiProvider::new(
            "test-key".to_string(),
            Some(base_url),
            "gemini-2.5-flash".to_string(),
            5,
        )
        .unwrap();

        let text = provider.generate_text("Explain rank").await.unwrap();
        assert_eq!(text, "Rank counts pivots.");
    }

    #[tokio::test]
    async fn test_rate_limit_from_upstream() {
        let router = Router::new().route(
            "/v1beta/models/gemini-2.5-flash:generateContent",
            post(|| async {
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(json!({"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}})),
                )
            }),
        );
        let base_url = spawn_upstream(router).await;
        let provider =
            GeminiProvider::new("k".to_string(), Some(base_url), "gemini-2.5-flash".to_string(), 5)
                .unwrap();

        let error = provider.generate_text("hi").await.unwrap_err();
        assert_eq!(error.kind(), "rate_limit");
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_network_error() {
        // Bind then drop so the port is very likely closed.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = GeminiProvider::new(
            "k".to_string(),
            Some(format!("http://{}/v1beta", addr)),
            "gemini-2.5-flash".to_string(),
            5,
        )
        .unwrap();

        let error = provider.generate_text("hi").await.unwrap_err();
        assert_eq!(error.kind(), "network");
    }

    /// Upstream answering every `generateContent` call with a fixed 200 body
    async fn spawn_fixed_upstream(body: &'static str) -> String {
        let router = Router::new().route(
            "/v1beta/models/gemini-2.5-flash:generateContent",
            post(move || async move { body }),
        );
        spawn_upstream(router).await
    }

    fn provider_for(base_url: String) -> GeminiProvider {
        GeminiProvider::new("k".to_string(), Some(base_url), "gemini-2.5-flash".to_string(), 5)
            .unwrap()
    }

    #[tokio::test]
    async fn test_answers_without_text_are_empty_responses() {
        for (body, reason) in [
            (r#"{"candidates":[]}"#, "no candidates returned"),
            (
                r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#,
                "prompt blocked (SAFETY)",
            ),
        ] {
            let provider = provider_for(spawn_fixed_upstream(body).await);
            match provider.generate_text("Explain rank").await {
                Err(ProviderError::EmptyResponse(message)) => assert_eq!(message, reason),
                other => panic!("unexpected {:?} for {}", other, body),
            }
        }
    }

    #[tokio::test]
    async fn test_undecodable_body_is_internal() {
        let provider = provider_for(spawn_fixed_upstream("<html>oops</html>").await);
        let error = provider.generate_text("Explain rank").await.unwrap_err();
        assert!(matches!(error, ProviderError::Unexpected(_)));
        assert_eq!(error.kind(), "internal");
    }

    #[tokio::test]
    async fn test_relay_status_for_unusable_upstream_answers() {
        let cases = [
            (r#"{"candidates":[]}"#, 502, "empty_response"),
            (r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#, 502, "empty_response"),
            ("<html>oops</html>", 500, "internal"),
        ];

        for (body, status, kind) in cases {
            let provider = provider_for(spawn_fixed_upstream(body).await);
            let relay = spawn_relay(Arc::new(provider), test_config("")).await;

            let response = reqwest::Client::new()
                .post(format!("{}/api/gemini", relay))
                .json(&json!({"prompt": "Explain Rank & Linear Independence"}))
                .send()
                .await
                .unwrap();

            assert_eq!(response.status().as_u16(), status, "body {}", body);
            let error: ErrorResponse = response.json().await.unwrap();
            assert_eq!(error.error.kind, kind, "body {}", body);
        }
    }

    #[test]
    fn test_credential_hint_names_the_setting() {
        let body = r#"{"error":{"code":401,"message":"Request had invalid authentication credentials.","status":"UNAUTHENTICATED"}}"#;
        match classify_status(401, body, "VERTEXAI_ACCESS_TOKEN") {
            ProviderError::Authentication(msg) => {
                assert!(msg.contains("VERTEXAI_ACCESS_TOKEN"));
                assert!(!msg.contains("GEMINI_API_KEY"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
