// Application state
// Built once at startup from the configuration; read-only afterwards

use std::sync::Arc;
use std::time::Duration;

use crate::chat::ReplyGenerator;
use crate::config::Config;
use crate::relay::{ContactRelay, TranscriptForwarder};

/// State handle passed to axum handlers
pub type SharedState = Arc<AppState>;

/// Main application state
///
/// Contains no mutable data; requests never coordinate with each other.
#[derive(Clone)]
pub struct AppState {
    /// Configuration the components were built from
    pub config: Arc<Config>,
    /// Provider chain for chat replies
    pub replies: ReplyGenerator,
    /// Transcript forwarding to Web3Forms
    pub forwarder: TranscriptForwarder,
    /// Contact-form delivery chain
    pub contact: ContactRelay,
}

impl AppState {
    /// Assemble state from prebuilt components
    pub fn new(
        config: Config,
        replies: ReplyGenerator,
        forwarder: TranscriptForwarder,
        contact: ContactRelay,
    ) -> Self {
        Self {
            config: Arc::new(config),
            replies,
            forwarder,
            contact,
        }
    }

    /// Build every component from configuration, sharing one HTTP client
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        // Per-call timeouts are tighter; this only caps anything left unbounded
        let client_timeout = config
            .providers
            .timeout
            .max(config.forwarding.timeout)
            + Duration::from_secs(5);
        let client = reqwest::Client::builder()
            .timeout(client_timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        let replies = ReplyGenerator::from_config(&config.providers, client.clone());
        let forwarder = TranscriptForwarder::from_config(&config.forwarding, client.clone());
        let contact = ContactRelay::from_config(&config, client);

        tracing::info!(
            providers = ?replies.provider_names(),
            forwarding_configured = config.forwarding.access_key.is_some(),
            smtp_configured = contact.diagnostics().smtp_configured,
            "Application state initialized"
        );

        Ok(Self::new(config, replies, forwarder, contact))
    }

    /// Wrap in the shared handle used by the router
    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }
}
