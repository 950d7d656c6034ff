//! Transcript forwarding
//!
//! Emails each chat transcript through Web3Forms. The caller decides what to
//! do with a failure; the chat endpoint only reports it as metadata.

use crate::chat::transcript::Transcript;
use crate::config::{ForwardingConfig, DEFAULT_SENDER_EMAIL};
use crate::relay::web3forms::{ForwardError, Submission, Web3FormsClient};
use crate::relay::BRAND;

/// Sends finished chat transcripts to the form relay
#[derive(Clone)]
pub struct TranscriptForwarder {
    web3forms: Web3FormsClient,
    sender_email: String,
}

impl TranscriptForwarder {
    /// Create a forwarder over an existing Web3Forms client
    pub fn new(web3forms: Web3FormsClient, sender_email: impl Into<String>) -> Self {
        Self {
            web3forms,
            sender_email: sender_email.into(),
        }
    }

    /// Build from configuration
    pub fn from_config(config: &ForwardingConfig, client: reqwest::Client) -> Self {
        let web3forms = Web3FormsClient::new(
            client,
            config.access_key.clone(),
            config.endpoint.clone(),
            config.timeout,
        );
        let sender = config
            .email_to
            .clone()
            .unwrap_or_else(|| DEFAULT_SENDER_EMAIL.to_string());
        Self::new(web3forms, sender)
    }

    /// Forward a transcript
    ///
    /// Returns `ForwardError::NoKey` without any network I/O when no access
    /// key is configured.
    pub async fn forward(&self, transcript: &Transcript) -> Result<(), ForwardError> {
        if !self.web3forms.is_configured() {
            return Err(ForwardError::NoKey);
        }

        let submission = Submission {
            subject: format!("{} Chat Transcript", BRAND),
            sender_name: "Website Chat".to_string(),
            sender_email: self.sender_email.clone(),
            message: transcript.to_pretty_json()?,
        };

        let result = self.web3forms.submit(&submission).await;
        match &result {
            Ok(()) => tracing::info!(
                turns = transcript.conversation.len(),
                "Chat transcript forwarded"
            ),
            Err(e) => tracing::warn!(
                reason = e.reason(),
                error = %e,
                "Chat transcript forwarding failed"
            ),
        }
        result
    }
}
