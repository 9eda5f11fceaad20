//! Chat-completions client for an OpenAI-compatible API (Groq by default).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::GenerationError;

use super::prompt::build_commit_prompt;

/// Nucleus sampling is left fully open.
const TOP_P: f32 = 1.0;

/// Maximum characters of an error body kept in [`GenerationError::Api`].
const MAX_ERROR_BODY: usize = 500;

/// Turns a diff into a commit message.
///
/// This abstraction allows substituting the remote model in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageGenerator: Send + Sync {
    /// Generate a commit message for `diff`, authorizing with `credential`.
    async fn generate(&self, diff: &str, credential: &str) -> Result<String, GenerationError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_completion_tokens: u32,
    top_p: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// [`MessageGenerator`] that calls `POST {base_url}/chat/completions`.
pub struct CompletionClient {
    http: reqwest::Client,
    config: Config,
}

impl CompletionClient {
    pub fn new(config: Config) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder()
            .timeout(config.api_timeout)
            .build()
            .map_err(GenerationError::Request)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Send a prompt and return the trimmed text of the first choice.
    pub async fn complete(&self, prompt: &str, credential: &str) -> Result<String, GenerationError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let body = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
            max_completion_tokens: self.config.max_tokens,
            top_p: TOP_P,
        };

        debug!(
            "Requesting completion from {} (model={}, temperature={}, max_tokens={})",
            url, self.config.model, self.config.temperature, self.config.max_tokens
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(credential)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        debug!("Completion API responded with {}", status);

        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "<unavailable>".to_string());
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body: text.trim().chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let payload: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.classify(e)
            } else {
                GenerationError::InvalidResponse(e.to_string())
            }
        })?;

        payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(GenerationError::EmptyResponse)
    }

    fn classify(&self, err: reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            GenerationError::Timeout(self.config.api_timeout)
        } else {
            GenerationError::Request(err)
        }
    }
}

#[async_trait]
impl MessageGenerator for CompletionClient {
    async fn generate(&self, diff: &str, credential: &str) -> Result<String, GenerationError> {
        let prompt = build_commit_prompt(diff);
        debug!("Commit prompt length: {} chars", prompt.len());
        self.complete(&prompt, credential).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_expected_fields() {
        let body = ChatRequest {
            model: "llama-3.3-70b-versatile",
            messages: [ChatMessage {
                role: "user",
                content: "hello",
            }],
            temperature: 0.3,
            max_completion_tokens: 300,
            top_p: TOP_P,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["model"], "llama-3.3-70b-versatile");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "hello");
        assert_eq!(value["max_completion_tokens"], 300);
        assert_eq!(value["top_p"], 1.0);
    }

    #[test]
    fn test_response_without_choices_deserializes() {
        let payload: ChatResponse = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        assert!(payload.choices.is_empty());
    }

    #[test]
    fn test_null_content_deserializes() {
        let payload: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert!(payload.choices[0].message.content.is_none());
    }
}
