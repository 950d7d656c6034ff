//! Gemini API adapter
//!
//! Calls the `generateContent` endpoint with the system prompt as a system
//! instruction and the conversation as alternating `user`/`model` contents.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::chat::models::{ChatRole, ChatTurn};
use crate::providers::extract::first_text;
use crate::providers::{ProviderError, ReplyProvider};

/// Known locations of the reply text, in order of preference
const TEXT_PATHS: &[&str] = &[
    "/candidates/0/content/parts/0/text",
    "/candidates/0/content",
    "/candidates/0/message/content",
    "/output/0/content",
    "/candidates/0/content/0",
];

/// Locations of a block reason when the prompt was refused
const BLOCK_REASON_PATHS: &[&str] = &["/promptFeedback/blockReason", "/prompt_feedback/block_reason"];

/// Request structure for the Gemini API
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: SystemInstruction,
    contents: Vec<RequestContent>,
}

#[derive(Serialize, Debug)]
struct SystemInstruction {
    parts: Vec<RequestPart>,
}

#[derive(Serialize, Debug)]
struct RequestContent {
    role: &'static str,
    parts: Vec<RequestPart>,
}

#[derive(Serialize, Debug)]
struct RequestPart {
    text: String,
}

impl RequestContent {
    fn new(role: ChatRole, text: &str) -> Self {
        let role = match role {
            ChatRole::User => "user",
            ChatRole::Assistant => "model",
        };
        Self {
            role,
            parts: vec![RequestPart {
                text: text.to_string(),
            }],
        }
    }
}

/// Gemini reply provider
#[derive(Clone)]
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    system_prompt: String,
}

impl GeminiProvider {
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

    /// `{base}/models/{model}:generateContent`, with the model name as one encoded segment
    fn endpoint_url(&self) -> Result<reqwest::Url, ProviderError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ProviderError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push("models")
            .push(&format!("{}:generateContent", self.model));
        Ok(url)
    }

    fn build_request(&self, history: &[ChatTurn], latest: &str) -> GenerateContentRequest {
        let mut contents: Vec<RequestContent> = history
            .iter()
            .map(|turn| RequestContent::new(turn.role, &turn.content))
            .collect();
        contents.push(RequestContent::new(ChatRole::User, latest));

        GenerateContentRequest {
            system_instruction: SystemInstruction {
                parts: vec![RequestPart {
                    text: self.system_prompt.clone(),
                }],
            },
            contents,
        }
    }
}

#[async_trait]
impl ReplyProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, history: &[ChatTurn], latest: &str) -> Result<String, ProviderError> {
        let url = self.endpoint_url()?;
        let request_body = self.build_request(history, latest);

        tracing::debug!(
            url = %url,
            model = %self.model,
            history_len = history.len(),
            "Calling Gemini API"
        );

        let response = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body)
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

        let body = response.text().await?;
        let parsed: Value = serde_json::from_str(&body)?;

        if let Some(text) = first_text(&parsed, TEXT_PATHS) {
            tracing::debug!(response_len = text.len(), "Received reply from Gemini API");
            return Ok(text);
        }

        match first_text(&parsed, BLOCK_REASON_PATHS) {
            Some(reason) => Err(ProviderError::Blocked(reason)),
            None => Err(ProviderError::NoContent),
        }
    }
}
