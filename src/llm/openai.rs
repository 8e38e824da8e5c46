//! OpenAI chat-completions client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ChatMessage, CompletionClient, LlmConfig, LlmError};

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    config: LlmConfig,
}

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
    /// Legacy completions shape
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        if config.api_key.is_none() {
            return Err(LlmError::MissingApiKey);
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, LlmError> {
        Self::new(LlmConfig::from_env())
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let api_key = self.config.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;
        let request = OpenAiRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        debug!(model = %self.config.model, messages = messages.len(), "calling OpenAI");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let result: OpenAiResponse = response.json().await?;
        first_content(result).ok_or(LlmError::EmptyCompletion)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

fn first_content(response: OpenAiResponse) -> Option<String> {
    let choice = response.choices.into_iter().next()?;
    choice
        .message
        .and_then(|m| m.content)
        .or(choice.text)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_key() {
        let err = OpenAiClient::new(LlmConfig::default()).unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }

    #[test]
    fn test_first_content_prefers_message() {
        let response: OpenAiResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"{\"id\":\"a\"}"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_content(response).as_deref(), Some("{\"id\":\"a\"}"));
    }

    #[test]
    fn test_first_content_legacy_text() {
        let response: OpenAiResponse =
            serde_json::from_str(r#"{"choices":[{"text":"hello"}]}"#).unwrap();
        assert_eq!(first_content(response).as_deref(), Some("hello"));
    }

    #[test]
    fn test_first_content_empty() {
        let response: OpenAiResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(first_content(response).is_none());
    }

    #[test]
    fn test_request_shape() {
        let messages = [ChatMessage::system("s"), ChatMessage::user("u")];
        let body = serde_json::to_value(OpenAiRequest {
            model: "gpt-3.5-turbo",
            messages: &messages,
            temperature: 0.6,
            max_tokens: 900,
        })
        .unwrap();
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["max_tokens"], 900);
    }
}
