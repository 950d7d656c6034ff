//! OpenAI chat-completions adapter

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::chat::models::ChatTurn;
use crate::providers::extract::first_text;
use crate::providers::{ProviderError, ReplyProvider};

const TEXT_PATHS: &[&str] = &["/choices/0/message/content"];

#[derive(Serialize, Debug)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Serialize, Debug)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// OpenAI reply provider
#[derive(Clone)]
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    system_prompt: String,
}

impl OpenAiProvider {
    /// Create a provider using the shared HTTP client
    pub fn new(
        client: reqwest::Client,
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            system_prompt: system_prompt.into(),
        }
    }

    fn build_request<'a>(
        &'a self,
        history: &'a [ChatTurn],
        latest: &'a str,
    ) -> ChatCompletionRequest<'a> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(RequestMessage {
            role: "system",
            content: &self.system_prompt,
        });
        messages.extend(history.iter().map(|turn| RequestMessage {
            role: turn.role.as_str(),
            content: &turn.content,
        }));
        messages.push(RequestMessage {
            role: "user",
            content: latest,
        });

        ChatCompletionRequest {
            model: &self.model,
            messages,
        }
    }
}

#[async_trait]
impl ReplyProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, history: &[ChatTurn], latest: &str) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        tracing::debug!(
            url = %url,
            model = %self.model,
            history_len = history.len(),
            "Calling OpenAI API"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.build_request(history, latest))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: Value = serde_json::from_str(&response.text().await?)?;
        first_text(&parsed, TEXT_PATHS).ok_or(ProviderError::NoContent)
    }
}
