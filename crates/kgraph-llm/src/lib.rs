//! kgraph LLM Provider Layer
//!
//! Pluggable LLM provider implementations of the `LlmProvider` trait from
//! `kgraph-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `ChatProvider`: HTTP provider for OpenAI-compatible chat completions
//!   (OpenAI, Ollama's `/v1` endpoint) and the Anthropic messages API
//!
//! # Examples
//!
//! ```
//! use kgraph_llm::MockProvider;
//! use kgraph_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate(None, "test prompt").unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod chat;
pub mod config;
mod error;
mod mock;

pub use chat::ChatProvider;
pub use config::{LlmConfig, Provider};
pub use error::LlmError;
pub use mock::MockProvider;
