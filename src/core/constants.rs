//! Constants shared by the relay server and the card client
//!
//! Route paths, provider defaults, and the fixed strings a card displays.

/// HTTP route constants
pub mod route {
    /// Prompt relay endpoint
    pub const RELAY: &str = "/api/gemini";

    /// Topic catalogue endpoint
    pub const TOPICS: &str = "/api/topics";

    /// Health check endpoint
    pub const HEALTH: &str = "/health";

    /// Provider connectivity check
    pub const TEST_CONNECTION: &str = "/test-connection";
}

/// Provider defaults
pub mod provider {
    /// Model used when the configuration names none
    pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

    /// Generative Language API base URL
    pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

    /// Default Vertex AI region
    pub const VERTEXAI_LOCATION: &str = "us-central1";

    /// Role attached to the single user turn sent upstream
    pub const USER_ROLE: &str = "user";
}

/// Error kind identifiers reported in relay error bodies
pub mod error_kind {
    pub const MALFORMED_INPUT: &str = "malformed_input";
    pub const AUTHENTICATION: &str = "authentication";
    pub const RATE_LIMIT: &str = "rate_limit";
    pub const NETWORK: &str = "network";
    pub const TIMEOUT: &str = "timeout";
    pub const EMPTY_RESPONSE: &str = "empty_response";
    pub const API_ERROR: &str = "api_error";
    pub const INTERNAL: &str = "internal";
}

/// Strings displayed by documentation cards
pub mod card {
    /// Shown until the relay answers
    pub const LOADING: &str = "Loading...";

    /// Shown when the relay call fails for any reason
    pub const FAILED: &str = "Failed to load from Gemini.";

    /// Prompt template prefix, followed by the topic subject
    pub const PROMPT_PREFIX: &str = "Explain ";

    /// Prompt template suffix
    pub const PROMPT_SUFFIX: &str =
        " in detail in simple, easy-to-understand text format only. No salutations.";
}
