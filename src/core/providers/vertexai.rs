//! Vertex AI provider implementation

use crate::core::provider::{Provider, ProviderError};
use crate::core::providers::gemini::{build_http_client, generate_content};
use async_trait::async_trait;
use reqwest::Client;

/// Setting named in credential error hints
const CREDENTIAL_SETTING: &str = "VERTEXAI_ACCESS_TOKEN";

/// Vertex AI provider for Google Cloud's Gemini models
pub struct VertexAIProvider {
    client: Client,
    project_id: String,
    location: String,
    access_token: String,
    base_url: Option<String>,
    model: String,
    timeout: u64,
}

impl VertexAIProvider {
    /// Create a new Vertex AI provider
    ///
    /// # Arguments
    ///
    /// * `project_id` - Google Cloud project ID
    /// * `location` - Google Cloud location (e.g., "us-central1")
    /// * `access_token` - Google Cloud access token (from gcloud auth or service account)
    /// * `base_url` - Optional endpoint override, defaults to the regional host
    /// * `model` - Publisher model identifier
    /// * `timeout` - Request timeout in seconds
    pub fn new(
        project_id: String,
        location: String,
        access_token: String,
        base_url: Option<String>,
        model: String,
        timeout: u64,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_http_client(timeout)?,
            project_id,
            location,
            access_token,
            base_url: base_url.map(|u| u.trim_end_matches('/').to_string()),
            model,
            timeout,
        })
    }

    /// Get the endpoint URL for the model
    fn endpoint_url(&self) -> String {
        let host = self
            .base_url
            .clone()
            .unwrap_or_else(|| format!("https://{}-aiplatform.googleapis.com/v1", self.location));

        format!(
            "{}/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            host, self.project_id, self.location, self.model
        )
    }
}

#[async_trait]
impl Provider for VertexAIProvider {
    async fn generate_text(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = self
            .client
            .post(self.endpoint_url())
            .bearer_auth(&self.access_token);
        generate_content(request, prompt, self.timeout, CREDENTIAL_SETTING).await
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &str {
        "Vertex AI"
    }
}
