//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults. The configuration is read once at startup and handed
//! to every component by parameter; nothing else reads the environment.

use std::env;
use std::time::Duration;

/// Default Gemini model when `GEMINI_MODEL` is unset
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-lite";
/// Default Gemini API base URL
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default OpenAI model when `OPENAI_MODEL` is unset
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
/// Default OpenAI API base URL
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
/// Web3Forms submission endpoint
pub const DEFAULT_WEB3FORMS_ENDPOINT: &str = "https://api.web3forms.com/submit";
/// Sender address used on forwarded transcripts when `EMAIL_TO` is unset
pub const DEFAULT_SENDER_EMAIL: &str = "no-reply@nanonux.com";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Language-model provider configuration
    pub providers: ProvidersConfig,
    /// Form-relay (Web3Forms) configuration
    pub forwarding: ForwardingConfig,
    /// SMTP fallback configuration for the contact form
    pub smtp: SmtpConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Credentials and model names for each reply provider
///
/// A missing key is a valid state meaning "skip this provider".
#[derive(Clone)]
pub struct ProvidersConfig {
    /// Gemini API key
    pub gemini_api_key: Option<String>,
    /// Gemini model name
    pub gemini_model: String,
    /// Gemini API base URL
    pub gemini_base_url: String,
    /// OpenAI API key
    pub openai_api_key: Option<String>,
    /// OpenAI model name
    pub openai_model: String,
    /// OpenAI API base URL
    pub openai_base_url: String,
    /// Upper bound on a single provider attempt
    pub timeout: Duration,
}

/// Web3Forms forwarding configuration
#[derive(Clone)]
pub struct ForwardingConfig {
    /// Web3Forms access key
    pub access_key: Option<String>,
    /// Submission endpoint
    pub endpoint: String,
    /// Destination address override (`EMAIL_TO`)
    pub email_to: Option<String>,
    /// Label written into `meta.source` of forwarded transcripts
    pub transcript_source: String,
    /// Upper bound on a single forwarding call
    pub timeout: Duration,
}

/// SMTP transport settings, the last-resort delivery channel
#[derive(Clone, Default)]
pub struct SmtpConfig {
    /// SMTP server host
    pub host: Option<String>,
    /// SMTP server port
    pub port: Option<u16>,
    /// SMTP username
    pub user: Option<String>,
    /// SMTP password
    pub pass: Option<String>,
}

/// SMTP settings with every required field present
#[derive(Clone)]
pub struct SmtpSettings {
    /// SMTP server host
    pub host: String,
    /// SMTP server port
    pub port: u16,
    /// SMTP username
    pub user: String,
    /// SMTP password
    pub pass: String,
    /// Recipient of contact submissions
    pub to: String,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let secs = |key: &str, default: u64| {
            var(key)
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(default)
        };

        Self {
            server: ServerConfig {
                port: var("PORT").and_then(|p| p.parse().ok()).unwrap_or(8080),
                host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            },
            providers: ProvidersConfig {
                gemini_api_key: var("GEMINI_API_KEY"),
                gemini_model: var("GEMINI_MODEL")
                    .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                gemini_base_url: var("GEMINI_API_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
                openai_api_key: var("OPENAI_API_KEY"),
                openai_model: var("OPENAI_MODEL")
                    .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
                openai_base_url: var("OPENAI_API_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
                timeout: Duration::from_secs(secs("PROVIDER_TIMEOUT_SECS", 10)),
            },
            forwarding: ForwardingConfig {
                access_key: var("WEB3FORMS_ACCESS_KEY"),
                endpoint: var("WEB3FORMS_ENDPOINT")
                    .unwrap_or_else(|| DEFAULT_WEB3FORMS_ENDPOINT.to_string()),
                email_to: var("EMAIL_TO"),
                transcript_source: var("TRANSCRIPT_SOURCE")
                    .unwrap_or_else(|| "nanonux-website chat".to_string()),
                timeout: Duration::from_secs(secs("FORWARD_TIMEOUT_SECS", 10)),
            },
            smtp: SmtpConfig {
                host: var("SMTP_HOST"),
                port: var("SMTP_PORT").and_then(|p| p.parse().ok()),
                user: var("SMTP_USER"),
                pass: var("SMTP_PASS"),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Complete SMTP settings, if every field needed to send mail is present
    ///
    /// The recipient is `EMAIL_TO`, falling back to the SMTP user.
    pub fn smtp_settings(&self) -> Option<SmtpSettings> {
        let smtp = &self.smtp;
        let user = smtp.user.clone()?;
        let to = self
            .forwarding
            .email_to
            .clone()
            .unwrap_or_else(|| user.clone());
        Some(SmtpSettings {
            host: smtp.host.clone()?,
            port: smtp.port?,
            pass: smtp.pass.clone()?,
            user,
            to,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Config::default().providers
    }
}

impl Default for ForwardingConfig {
    fn default() -> Self {
        Config::default().forwarding
    }
}

// Secrets are reported as presence only.
impl std::fmt::Debug for ProvidersConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvidersConfig")
            .field("gemini_api_key_present", &self.gemini_api_key.is_some())
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("openai_api_key_present", &self.openai_api_key.is_some())
            .field("openai_model", &self.openai_model)
            .field("openai_base_url", &self.openai_base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl std::fmt::Debug for ForwardingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForwardingConfig")
            .field("access_key_present", &self.access_key.is_some())
            .field("endpoint", &self.endpoint)
            .field("email_to", &self.email_to)
            .field("transcript_source", &self.transcript_source)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("pass_present", &self.pass.is_some())
            .finish()
    }
}
