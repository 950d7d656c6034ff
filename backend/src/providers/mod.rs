//! Reply providers
//!
//! Each third-party language-model API is wrapped in an adapter implementing
//! [`ReplyProvider`]. The reply generator holds them in priority order and asks
//! each in turn until one produces text.

pub mod extract;
pub mod gemini;
pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

use crate::chat::models::ChatTurn;

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

/// Provider error types
///
/// None of these reach the caller; the reply generator logs them and moves on
/// to the next provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network-level failure (connect, TLS, timeout inside the client)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status
    #[error("API returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Raw response body, for the logs
        body: String,
    },

    /// The response body was not JSON
    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The provider refused the prompt
    #[error("Prompt blocked: {0}")]
    Blocked(String),

    /// None of the known response shapes held any text
    #[error("No text content in response")]
    NoContent,

    /// The configured base URL cannot hold the request path
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// The attempt exceeded its time budget
    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// One language-model completion API
#[async_trait]
pub trait ReplyProvider: Send + Sync {
    /// Provider name, for logs
    fn name(&self) -> &str;

    /// Produce a reply to `latest` given the prior `history`
    ///
    /// Returns trimmed, non-empty text on success.
    async fn complete(&self, history: &[ChatTurn], latest: &str) -> Result<String, ProviderError>;
}
