use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Gemini API host.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default vision-capable model.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the Gemini caption client.
#[derive(Clone)]
pub struct GeminiCaptionConfig {
    /// API host (e.g., "https://generativelanguage.googleapis.com")
    pub endpoint: String,
    /// Model name (e.g., "gemini-2.0-flash")
    pub model: String,
    /// API key sent as `x-goog-api-key`. `None` or blank skips the request.
    pub api_key: Option<String>,
    /// Request timeout (default: 60s)
    pub timeout: Duration,
    /// Sampling parameters sent with every request
    pub generation: GenerationConfig,
}

/// Sampling parameters for `generateContent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.4,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 100,
        }
    }
}

impl Default for GeminiCaptionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            generation: GenerationConfig::default(),
        }
    }
}

// Hand-written so the key never lands in logs.
impl std::fmt::Debug for GeminiCaptionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiCaptionConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("generation", &self.generation)
            .finish()
    }
}

impl GeminiCaptionConfig {
    /// Create a new config with the given API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// Set the API host.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the API key, replacing any existing one.
    pub fn api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// The API key, if one is set and not blank.
    pub fn usable_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Full `generateContent` URL for the configured model.
    pub fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_backend_contract() {
        let config = GeminiCaptionConfig::default();
        assert_eq!(
            config.generate_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(config.generation.top_k, 40);
        assert_eq!(config.generation.max_output_tokens, 100);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn trailing_slash_is_ignored() {
        let config = GeminiCaptionConfig::default()
            .endpoint("http://127.0.0.1:9000/")
            .model("gemini-test");
        assert_eq!(
            config.generate_url(),
            "http://127.0.0.1:9000/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn blank_key_is_not_usable() {
        assert_eq!(GeminiCaptionConfig::with_api_key("  ").usable_api_key(), None);
        assert_eq!(
            GeminiCaptionConfig::with_api_key(" abc ").usable_api_key(),
            Some("abc")
        );
    }

    #[test]
    fn debug_redacts_key() {
        let rendered = format!("{:?}", GeminiCaptionConfig::with_api_key("secret-key"));
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("<redacted>"));
    }
}
