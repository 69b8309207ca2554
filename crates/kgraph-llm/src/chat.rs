//! Chat Provider Implementation
//!
//! Talks to hosted or local chat-completion endpoints over HTTP.
//!
//! # Features
//!
//! - OpenAI chat-completions wire format (also served by Ollama under `/v1`)
//! - Anthropic messages wire format
//! - Per-call timeout
//! - Retry logic with exponential backoff on communication errors
//!
//! The provider uses the blocking `reqwest` client. Callers on an async
//! runtime run it inside `tokio::task::spawn_blocking`.
//!
//! # Examples
//!
//! ```no_run
//! use kgraph_llm::{ChatProvider, LlmConfig};
//! use kgraph_domain::traits::LlmProvider;
//!
//! let provider = ChatProvider::new(LlmConfig::default()).unwrap();
//! let reply = provider.generate(Some("Answer briefly."), "Who built the steam engine?");
//! ```

use crate::config::{LlmConfig, Provider};
use crate::LlmError;
use kgraph_domain::traits::LlmProvider as LlmProviderTrait;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Anthropic API version header value
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// HTTP provider for chat-style LLM endpoints
pub struct ChatProvider {
    config: LlmConfig,
    api_key: Option<String>,
    client: Client,
    backoff_base: Duration,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Request body for OpenAI-compatible chat completions
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Request body for the Anthropic messages API
#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Outcome of a single attempt: either final, or worth retrying
enum Attempt {
    Done(Result<String, LlmError>),
    Retry(LlmError),
}

impl ChatProvider {
    /// Create a provider, reading the API key from the provider's environment variable
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Authentication` when the provider needs a key and the
    /// variable is unset, or `LlmError::Other` when the config is invalid.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let api_key = match config.provider.api_key_env() {
            Some(var) => match std::env::var(var) {
                Ok(key) if !key.trim().is_empty() => Some(key),
                _ => {
                    return Err(LlmError::Authentication(format!(
                        "environment variable {} is not set",
                        var
                    )))
                }
            },
            None => None,
        };
        Self::with_api_key(config, api_key)
    }

    /// Create a provider with an explicit API key
    pub fn with_api_key(config: LlmConfig, api_key: Option<String>) -> Result<Self, LlmError> {
        config.validate().map_err(LlmError::Other)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            api_key,
            client,
            backoff_base: Duration::from_secs(1),
        })
    }

    /// Override the first backoff delay (doubles on each retry)
    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    /// The configuration this provider was built from
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn send_once(&self, system: Option<&str>, prompt: &str) -> Attempt {
        let mut request = self.client.post(&self.config.base_url);

        request = match self.config.provider {
            Provider::Anthropic => {
                let body = MessagesRequest {
                    model: &self.config.model,
                    max_tokens: self.config.max_tokens,
                    temperature: self.config.temperature,
                    system,
                    messages: vec![ChatMessage {
                        role: "user",
                        content: prompt,
                    }],
                };
                let mut req = request
                    .header("anthropic-version", ANTHROPIC_VERSION)
                    .json(&body);
                if let Some(key) = &self.api_key {
                    req = req.header("x-api-key", key);
                }
                req
            }
            Provider::Openai | Provider::Ollama => {
                let mut messages = Vec::with_capacity(2);
                if let Some(system) = system {
                    messages.push(ChatMessage {
                        role: "system",
                        content: system,
                    });
                }
                messages.push(ChatMessage {
                    role: "user",
                    content: prompt,
                });
                let body = ChatRequest {
                    model: &self.config.model,
                    messages,
                    temperature: self.config.temperature,
                    max_tokens: self.config.max_tokens,
                };
                let mut req = request.json(&body);
                if let Some(key) = &self.api_key {
                    req = req.bearer_auth(key);
                }
                req
            }
        };

        let response = match request.send() {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return Attempt::Retry(LlmError::Timeout(self.config.timeout_secs))
            }
            Err(e) => {
                return Attempt::Retry(LlmError::Communication(format!("Request failed: {}", e)))
            }
        };

        let status = response.status();
        if status.is_success() {
            return Attempt::Done(self.parse_body(response));
        }

        match status {
            StatusCode::TOO_MANY_REQUESTS => Attempt::Done(Err(LlmError::RateLimitExceeded)),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Attempt::Done(Err(
                LlmError::Authentication(format!("HTTP {}", status)),
            )),
            StatusCode::NOT_FOUND => {
                Attempt::Done(Err(LlmError::ModelNotAvailable(self.config.model.clone())))
            }
            _ => {
                let text = response
                    .text()
                    .unwrap_or_else(|_| "Unknown error".to_string());
                let err = LlmError::Communication(format!("HTTP {}: {}", status, text));
                if status.is_server_error() {
                    Attempt::Retry(err)
                } else {
                    Attempt::Done(Err(err))
                }
            }
        }
    }

    fn parse_body(&self, response: reqwest::blocking::Response) -> Result<String, LlmError> {
        let invalid = |e: reqwest::Error| {
            LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
        };

        match self.config.provider {
            Provider::Anthropic => {
                let body: MessagesResponse = response.json().map_err(invalid)?;
                let text: String = body
                    .content
                    .into_iter()
                    .filter(|block| block.kind == "text")
                    .filter_map(|block| block.text)
                    .collect();
                if text.is_empty() {
                    return Err(LlmError::InvalidResponse("no text content".to_string()));
                }
                Ok(text)
            }
            Provider::Openai | Provider::Ollama => {
                let body: ChatResponse = response.json().map_err(invalid)?;
                body.choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.message.content)
                    .ok_or_else(|| LlmError::InvalidResponse("no choices returned".to_string()))
            }
        }
    }
}

/// Delay before retry number `attempt` (1-based): 1x, 2x, 4x the base, saturating
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
}

impl LlmProviderTrait for ChatProvider {
    type Error = LlmError;

    fn generate(&self, system: Option<&str>, prompt: &str) -> Result<String, Self::Error> {
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.config.max_retries {
            match self.send_once(system, prompt) {
                Attempt::Done(result) => return result,
                Attempt::Retry(err) => {
                    warn!(attempt = attempts + 1, error = %err, "LLM request failed");
                    last_error = Some(err);
                }
            }

            attempts += 1;
            if attempts < self.config.max_retries {
                let delay = backoff_delay(self.backoff_base, attempts);
                debug!(?delay, "retrying LLM request");
                std::thread::sleep(delay);
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
