//! Reply generation
//!
//! Tries each configured provider in priority order and returns the first
//! reply. Providers are tried strictly one after another; a failure, an empty
//! answer or a timeout moves on to the next one. When nothing answers, the
//! fixed fallback reply is returned, so generation never fails.

use std::sync::Arc;
use std::time::Duration;

use crate::chat::models::ChatTurn;
use crate::chat::prompt::{FALLBACK_REPLY, SYSTEM_PROMPT};
use crate::config::ProvidersConfig;
use crate::providers::{GeminiProvider, OpenAiProvider, ProviderError, ReplyProvider};

/// Ordered provider chain with a static fallback
#[derive(Clone)]
pub struct ReplyGenerator {
    providers: Vec<Arc<dyn ReplyProvider>>,
    timeout: Duration,
}

impl ReplyGenerator {
    /// Create a generator over an explicit provider list
    pub fn new(providers: Vec<Arc<dyn ReplyProvider>>, timeout: Duration) -> Self {
        Self { providers, timeout }
    }

    /// Build the chain from configuration: Gemini first, then OpenAI
    ///
    /// Providers without a key are left out.
    pub fn from_config(config: &ProvidersConfig, client: reqwest::Client) -> Self {
        let mut providers: Vec<Arc<dyn ReplyProvider>> = Vec::new();

        if let Some(key) = &config.gemini_api_key {
            providers.push(Arc::new(GeminiProvider::new(
                client.clone(),
                key.clone(),
                config.gemini_model.clone(),
                config.gemini_base_url.clone(),
                SYSTEM_PROMPT,
            )));
        }

        if let Some(key) = &config.openai_api_key {
            providers.push(Arc::new(OpenAiProvider::new(
                client,
                key.clone(),
                config.openai_model.clone(),
                config.openai_base_url.clone(),
                SYSTEM_PROMPT,
            )));
        }

        Self::new(providers, config.timeout)
    }

    /// Names of the providers in the order they are tried
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Generate a reply to `latest`
    pub async fn generate_reply(&self, history: &[ChatTurn], latest: &str) -> String {
        for provider in &self.providers {
            match self.attempt(provider.as_ref(), history, latest).await {
                Ok(text) => {
                    tracing::info!(
                        provider = provider.name(),
                        reply_len = text.len(),
                        "Reply generated"
                    );
                    return text;
                }
                Err(e) => {
                    tracing::warn!(
                        provider = provider.name(),
                        error = %e,
                        "Provider failed, trying next"
                    );
                }
            }
        }

        tracing::info!(
            providers_tried = self.providers.len(),
            "No provider produced a reply, using fallback"
        );
        FALLBACK_REPLY.to_string()
    }

    async fn attempt(
        &self,
        provider: &dyn ReplyProvider,
        history: &[ChatTurn],
        latest: &str,
    ) -> Result<String, ProviderError> {
        let text = tokio::time::timeout(self.timeout, provider.complete(history, latest))
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout))??;

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ProviderError::NoContent);
        }
        Ok(trimmed.to_string())
    }
}
