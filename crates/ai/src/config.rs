use std::time::Duration;

/// Default API root for OpenAI-compatible chat completions.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model for photo analysis (must accept image input).
pub const DEFAULT_VISION_MODEL: &str = "gpt-4.1-mini";

/// Default model for adoption-profile writing.
pub const DEFAULT_PROFILE_MODEL: &str = "gpt-3.5-turbo";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 90;

/// Connection settings for the chat-completion API.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Bearer token. `None` leaves the server running but every AI call
    /// fails with [`crate::AiError::NotConfigured`].
    pub api_key: Option<String>,
    /// API root, without trailing slash, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub vision_model: String,
    pub profile_model: String,
    pub timeout: Duration,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            profile_model: DEFAULT_PROFILE_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
