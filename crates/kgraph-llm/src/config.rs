//! LLM connection settings
//!
//! The `[llm]` section of a kgraph configuration file deserializes into
//! [`LlmConfig`]. Validation lives here so every consumer rejects the same
//! values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// OpenAI chat completions endpoint
pub const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Anthropic messages endpoint
pub const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";

/// Ollama's OpenAI-compatible endpoint
pub const OLLAMA_CHAT_URL: &str = "http://localhost:11434/v1/chat/completions";

/// Default timeout for LLM requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of attempts per request
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Upper bound on `max_retries`
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// Wire protocol family spoken by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// OpenAI chat completions
    Openai,
    /// Anthropic messages API
    Anthropic,
    /// Ollama through its OpenAI-compatible endpoint
    Ollama,
}

impl Provider {
    /// Environment variable holding the API key, if the provider needs one
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            Provider::Openai => Some("OPENAI_API_KEY"),
            Provider::Anthropic => Some("ANTHROPIC_API_KEY"),
            Provider::Ollama => None,
        }
    }

    /// Endpoint used when no base URL is configured
    pub fn default_url(&self) -> &'static str {
        match self {
            Provider::Openai => OPENAI_CHAT_URL,
            Provider::Anthropic => ANTHROPIC_MESSAGES_URL,
            Provider::Ollama => OLLAMA_CHAT_URL,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::Openai => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Ollama => "ollama",
        };
        f.write_str(name)
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Provider::Openai),
            "anthropic" | "claude" => Ok(Provider::Anthropic),
            "ollama" => Ok(Provider::Ollama),
            other => Err(format!("unknown LLM provider '{}'", other)),
        }
    }
}

/// Configuration for a chat-style LLM endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Protocol family
    pub provider: Provider,

    /// Model identifier sent with each request
    pub model: String,

    /// Sampling temperature in [0.0, 2.0]
    pub temperature: f64,

    /// Maximum tokens to generate per call
    pub max_tokens: u32,

    /// Full endpoint URL
    pub base_url: String,

    /// Per-call timeout in seconds
    pub timeout_secs: u64,

    /// Attempts per call before giving up on communication errors
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Openai,
            model: "gpt-4o".to_string(),
            temperature: 0.2,
            max_tokens: 4096,
            base_url: OPENAI_CHAT_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl LlmConfig {
    /// Validate the settings
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("llm.model must not be empty".to_string());
        }
        if self.base_url.trim().is_empty() {
            return Err("llm.base_url must not be empty".to_string());
        }
        if !self.temperature.is_finite() || !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "llm.temperature must be in [0.0, 2.0], got {}",
                self.temperature
            ));
        }
        if self.max_tokens == 0 {
            return Err("llm.max_tokens must be greater than 0".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("llm.timeout_secs must be greater than 0".to_string());
        }
        if self.max_retries == 0 || self.max_retries > MAX_RETRIES_LIMIT {
            return Err(format!(
                "llm.max_retries must be between 1 and {}, got {}",
                MAX_RETRIES_LIMIT, self.max_retries
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(LlmConfig::default().validate().is_ok());
    }

    #[test]
    fn test_temperature_bounds() {
        let mut config = LlmConfig::default();
        config.temperature = 2.0;
        assert!(config.validate().is_ok());
        config.temperature = 2.1;
        assert!(config.validate().is_err());
        config.temperature = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_model_rejected() {
        let config = LlmConfig {
            model: " ".to_string(),
            ..LlmConfig::default()
        };
        assert!(config.validate().unwrap_err().contains("model"));
    }

    #[test]
    fn test_max_retries_bounds() {
        let mut config = LlmConfig::default();
        config.max_retries = MAX_RETRIES_LIMIT;
        assert!(config.validate().is_ok());
        config.max_retries = MAX_RETRIES_LIMIT + 1;
        assert!(config.validate().unwrap_err().contains("max_retries"));
        config.max_retries = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::Openai);
        assert_eq!("claude".parse::<Provider>().unwrap(), Provider::Anthropic);
        assert!("gemini".parse::<Provider>().is_err());
    }

    #[test]
    fn test_provider_api_key_env() {
        assert_eq!(Provider::Ollama.api_key_env(), None);
        assert_eq!(Provider::Anthropic.api_key_env(), Some("ANTHROPIC_API_KEY"));
    }
}
