//! LLM-backed roadmap generation.
//!
//! A [`CompletionClient`] turns a chat transcript into text; the
//! [`RoadmapGenerator`] drives it through the decode-and-repair pipeline.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod decode;
mod generator;
mod openai;

pub use decode::{DecodeError, decode_roadmap, extract_json};
pub use generator::{GenerateError, RoadmapGenerator};
pub use openai::OpenAiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("OPENAI_API_KEY not set")]
    MissingApiKey,
    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("completion API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("completion response had no content")]
    EmptyCompletion,
}

/// Unified completion interface
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send the transcript, return the model's raw text
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;

    /// Get the model name for logging
    fn model_name(&self) -> &str;
}

/// Completion endpoint settings, read from the environment.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-3.5-turbo".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            temperature: 0.6,
            max_tokens: 900,
            timeout_seconds: 30,
        }
    }
}

impl LlmConfig {
    /// `OPENAI_API_KEY`, `OPENAI_MODEL` and `OPENAI_BASE_URL`. A missing key
    /// is not an error here; it only disables the remote path.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            model: std::env::var("OPENAI_MODEL").unwrap_or(defaults.model),
            base_url: std::env::var("OPENAI_BASE_URL").unwrap_or(defaults.base_url),
            ..defaults
        }
    }
}
