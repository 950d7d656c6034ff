//! Contact-form delivery
//!
//! Submissions go through Web3Forms first and SMTP second. Each channel is
//! only tried when configured; a channel failure moves on to the next one.

use serde::Serialize;

use crate::config::Config;
use crate::relay::smtp::SmtpRelay;
use crate::relay::web3forms::{Submission, Web3FormsClient};
use crate::relay::BRAND;

/// A validated contact-form submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    /// Visitor's name
    pub name: String,
    /// Visitor's email address
    pub email: String,
    /// Service the visitor is asking about
    pub service: Option<String>,
    /// Free-form message
    pub message: String,
}

impl ContactSubmission {
    /// Email subject for this submission
    pub fn subject(&self) -> String {
        format!(
            "{} Contact: {}",
            BRAND,
            self.service.as_deref().unwrap_or("General Inquiry")
        )
    }

    /// Service name, or `-` when none was chosen
    pub fn service_label(&self) -> &str {
        self.service.as_deref().unwrap_or("-")
    }

    fn to_web3forms(&self) -> Submission {
        Submission {
            subject: self.subject(),
            sender_name: self.name.clone(),
            sender_email: self.email.clone(),
            message: format!("Service: {}\n\n{}", self.service_label(), self.message),
        }
    }
}

/// Channel a submission was delivered through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryChannel {
    /// Web3Forms API
    Web3Forms,
    /// Direct SMTP
    Smtp,
}

impl DeliveryChannel {
    /// Human-readable confirmation
    pub fn confirmation(&self) -> &'static str {
        match self {
            DeliveryChannel::Web3Forms => "Email sent via Web3Forms",
            DeliveryChannel::Smtp => "Email sent via SMTP",
        }
    }
}

/// Result of running the delivery chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Delivered through the given channel
    Sent(DeliveryChannel),
    /// No channel is configured
    NotConfigured,
    /// Every configured channel failed; one entry per attempt
    Failed(Vec<String>),
}

/// Configuration presence report; never contains secret values
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DeliveryDiagnostics {
    /// Whether a Web3Forms key is set
    pub web3forms_key_present: bool,
    /// Length of the Web3Forms key
    pub web3forms_key_length: usize,
    /// Whether SMTP is fully configured
    pub smtp_configured: bool,
    /// Destination address override
    pub email_to: Option<String>,
}

/// Ordered delivery chain for contact submissions
#[derive(Clone)]
pub struct ContactRelay {
    web3forms: Web3FormsClient,
    smtp: Option<SmtpRelay>,
    email_to: Option<String>,
}

impl ContactRelay {
    /// Create a relay from its channels
    pub fn new(
        web3forms: Web3FormsClient,
        smtp: Option<SmtpRelay>,
        email_to: Option<String>,
    ) -> Self {
        Self {
            web3forms,
            smtp,
            email_to,
        }
    }

    /// Build from configuration
    ///
    /// An SMTP configuration that cannot be turned into a transport is logged
    /// and treated as absent.
    pub fn from_config(config: &Config, client: reqwest::Client) -> Self {
        let web3forms = Web3FormsClient::new(
            client,
            config.forwarding.access_key.clone(),
            config.forwarding.endpoint.clone(),
            config.forwarding.timeout,
        );

        let smtp = config.smtp_settings().and_then(|settings| {
            SmtpRelay::new(&settings, config.forwarding.timeout)
                .map_err(|e| {
                    tracing::error!(error = %e, host = %settings.host, "Invalid SMTP configuration");
                })
                .ok()
        });

        Self::new(web3forms, smtp, config.forwarding.email_to.clone())
    }

    /// Presence report for the configured channels
    pub fn diagnostics(&self) -> DeliveryDiagnostics {
        DeliveryDiagnostics {
            web3forms_key_present: self.web3forms.is_configured(),
            web3forms_key_length: self.web3forms.key_length(),
            smtp_configured: self.smtp.is_some(),
            email_to: self.email_to.clone(),
        }
    }

    /// Run the delivery chain for one submission
    pub async fn deliver(&self, submission: &ContactSubmission) -> DeliveryOutcome {
        let mut failures = Vec::new();

        if self.web3forms.is_configured() {
            match self.web3forms.submit(&submission.to_web3forms()).await {
                Ok(()) => return DeliveryOutcome::Sent(DeliveryChannel::Web3Forms),
                Err(e) => {
                    tracing::warn!(
                        reason = e.reason(),
                        error = %e,
                        "Web3Forms delivery failed, trying SMTP"
                    );
                    failures.push(format!("{}: {}", e.reason(), e));
                }
            }
        }

        if let Some(smtp) = &self.smtp {
            match smtp.send(submission).await {
                Ok(()) => return DeliveryOutcome::Sent(DeliveryChannel::Smtp),
                Err(e) => {
                    tracing::error!(error = %e, "SMTP delivery failed");
                    failures.push(format!("smtp_error: {}", e));
                }
            }
        }

        if failures.is_empty() {
            DeliveryOutcome::NotConfigured
        } else {
            DeliveryOutcome::Failed(failures)
        }
    }
}
