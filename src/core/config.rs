//! Application configuration management
//!
//! Configuration comes from an optional TOML file with credentials
//! overridable from the environment. Everything is validated at startup so
//! the process fails fast when misconfigured.

use crate::core::constants::provider::{DEFAULT_MODEL, VERTEXAI_LOCATION};
use crate::core::provider::ProviderType;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default request timeout in seconds
const DEFAULT_REQUEST_TIMEOUT: u64 = 60;

/// Default server port
const DEFAULT_PORT: u16 = 3000;

/// Default configuration file looked up when `CONFIG_PATH` is unset
const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct VertexAIConfig {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model")]
    pub name: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestConfig {
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    /// Upper bound on prompt length in characters; unset means unlimited
    #[serde(default)]
    pub max_prompt_chars: Option<usize>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            max_prompt_chars: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ClientConfig {
    #[serde(default)]
    pub relay_url: Option<String>,
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT
}

#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub vertexai: VertexAIConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub request: RequestConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            gemini: GeminiConfig::default(),
            vertexai: VertexAIConfig::default(),
            model: ModelConfig::default(),
            server: ServerConfig::default(),
            request: RequestConfig::default(),
            client: ClientConfig::default(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Provider type (Gemini or VertexAI)
    pub provider: ProviderType,

    /// Generative Language API key
    pub gemini_api_key: Option<String>,

    /// Generative Language API base URL override
    pub gemini_base_url: Option<String>,

    /// Vertex AI specific settings
    pub vertexai_project_id: Option<String>,
    pub vertexai_location: String,
    pub vertexai_access_token: Option<String>,
    pub vertexai_base_url: Option<String>,

    /// Model identifier sent upstream
    pub model: String,

    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Logging level
    pub log_level: String,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Maximum accepted prompt length in characters
    pub max_prompt_chars: Option<usize>,

    /// Relay URL used by the card client
    pub relay_url: String,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed, or if the
    /// provider name is unknown.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig =
            toml::from_str(content).context("Failed to parse TOML configuration")?;
        Self::from_toml(config)
    }

    fn from_toml(config: TomlConfig) -> Result<Self> {
        let provider = ProviderType::parse(&config.provider)
            .context("Invalid provider value. Must be one of: gemini, vertexai")?;

        let relay_url = config.client.relay_url.unwrap_or_else(|| {
            let host = if config.server.host == "0.0.0.0" {
                "127.0.0.1"
            } else {
                config.server.host.as_str()
            };
            format!("http://{}:{}/api/gemini", host, config.server.port)
        });

        Ok(Config {
            provider,
            gemini_api_key: non_empty(config.gemini.api_key),
            gemini_base_url: config.gemini.base_url,
            vertexai_project_id: non_empty(config.vertexai.project_id),
            vertexai_location: config
                .vertexai
                .location
                .unwrap_or_else(|| VERTEXAI_LOCATION.to_string()),
            vertexai_access_token: non_empty(config.vertexai.access_token),
            vertexai_base_url: config.vertexai.base_url,
            model: config.model.name,
            host: config.server.host,
            port: config.server.port,
            log_level: config.server.log_level,
            request_timeout: config.request.request_timeout,
            max_prompt_chars: config.request.max_prompt_chars,
            relay_url,
        })
    }

    /// Load configuration from environment and config file
    ///
    /// Uses `CONFIG_PATH` when set (the file must then exist); otherwise
    /// reads `config.toml` if present and falls back to built-in defaults.
    /// Credentials from the environment override the file.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var("CONFIG_PATH") {
            Ok(path) => Self::from_file(path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            Err(_) => Self::from_toml(TomlConfig::default())?,
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Override credentials from environment-style lookups
    ///
    /// `GEMINI_API_KEY` wins over `GOOGLE_API_KEY`; empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = non_empty(lookup("GEMINI_API_KEY").or_else(|| lookup("GOOGLE_API_KEY")))
        {
            self.gemini_api_key = Some(key);
        }
        if let Some(token) = non_empty(lookup("VERTEXAI_ACCESS_TOKEN")) {
            self.vertexai_access_token = Some(token);
        }
        if let Some(project) = non_empty(lookup("VERTEXAI_PROJECT_ID")) {
            self.vertexai_project_id = Some(project);
        }
    }

    /// Check that the selected provider has what it needs to make calls
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout == 0 {
            bail!("request_timeout must be greater than zero");
        }
        if self.model.trim().is_empty() {
            bail!("model name must not be empty");
        }
        if !self.validate_api_key() {
            match self.provider {
                ProviderType::Gemini => {
                    bail!("Missing Gemini API key: set [gemini] api_key or GEMINI_API_KEY")
                }
                ProviderType::VertexAI => bail!(
                    "Missing Vertex AI credentials: set [vertexai] project_id and access_token"
                ),
            }
        }
        Ok(())
    }

    /// Whether credentials for the selected provider are present
    pub fn validate_api_key(&self) -> bool {
        match self.provider {
            ProviderType::Gemini => self.gemini_api_key.is_some(),
            ProviderType::VertexAI => {
                self.vertexai_access_token.is_some() && self.vertexai_project_id.is_some()
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_config() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            provider = "gemini"

            [gemini]
            api_key = "AIza-test"

            [model]
            name = "gemini-2.5-pro"

            [server]
            host = "0.0.0.0"
            port = 8080
            log_level = "debug"

            [request]
            request_timeout = 15
            max_prompt_chars = 2000
        "#
        )
        .unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_config() {
        let file = create_test_config();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.provider, ProviderType::Gemini);
        assert_eq!(config.gemini_api_key.as_deref(), Some("AIza-test"));
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.port, 8080);
        assert_eq!(config.request_timeout, 15);
        assert_eq!(config.max_prompt_chars, Some(2000));
        assert_eq!(config.relay_url, "http://127.0.0.1:8080/api/gemini");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_when_empty() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.provider, ProviderType::Gemini);
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.port, 3000);
        assert_eq!(config.request_timeout, 60);
        assert_eq!(config.max_prompt_chars, None);
        assert_eq!(config.vertexai_location, "us-central1");
        assert!(!config.validate_api_key());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides_credentials() {
        let mut config = Config::from_toml_str("[gemini]\napi_key = \"from-file\"").unwrap();
        let env: HashMap<&str, &str> =
            HashMap::from([("GOOGLE_API_KEY", "google"), ("GEMINI_API_KEY", "gemini")]);
        config.apply_env_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.gemini_api_key.as_deref(), Some("gemini"));

        let mut config = Config::from_toml_str("[gemini]\napi_key = \"from-file\"").unwrap();
        config.apply_env_overrides(|k| (k == "GEMINI_API_KEY").then(|| "  ".to_string()));
        assert_eq!(config.gemini_api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_vertexai_requires_project_and_token() {
        let mut config = Config::from_toml_str(
            r#"
            provider = "vertexai"
            [vertexai]
            project_id = "matrix-hub"
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        config.apply_env_overrides(|k| (k == "VERTEXAI_ACCESS_TOKEN").then(|| "ya29".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_provider() {
        assert!(Config::from_toml_str("provider = \"openai\"").is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config =
            Config::from_toml_str("[gemini]\napi_key = \"k\"\n[request]\nrequest_timeout = 0")
                .unwrap();
        assert!(config.validate().is_err());
    }
}
