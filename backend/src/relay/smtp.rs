//! SMTP delivery
//!
//! Last-resort channel for contact submissions. Port 465 uses implicit TLS,
//! any other port negotiates STARTTLS.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::config::SmtpSettings;
use crate::relay::contact::ContactSubmission;

/// SMTP delivery errors
#[derive(Debug, Error)]
pub enum SmtpError {
    /// An address could not be parsed
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The message could not be built
    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    /// The SMTP exchange failed
    #[error("SMTP error: {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync>),
}

impl From<lettre::transport::smtp::Error> for SmtpError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        SmtpError::Transport(Box::new(err))
    }
}

/// Something that can hand a finished message to a mail server
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Deliver one message
    async fn deliver(&self, message: Message) -> Result<(), SmtpError>;
}

#[async_trait]
impl MailTransport for AsyncSmtpTransport<Tokio1Executor> {
    async fn deliver(&self, message: Message) -> Result<(), SmtpError> {
        self.send(message).await?;
        Ok(())
    }
}

/// SMTP relay for contact submissions
#[derive(Clone)]
pub struct SmtpRelay {
    transport: Arc<dyn MailTransport>,
    sender: Address,
    recipient: Mailbox,
}

impl SmtpRelay {
    /// Build a relay from complete SMTP settings
    ///
    /// No connection is opened until the first message is sent.
    pub fn new(settings: &SmtpSettings, timeout: Duration) -> Result<Self, SmtpError> {
        let builder = if settings.port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
        };

        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(
                settings.user.clone(),
                settings.pass.clone(),
            ))
            .timeout(Some(timeout))
            .build();

        Self::with_transport(Arc::new(transport), settings)
    }

    /// Build a relay around an existing transport
    ///
    /// The login name is used as the sender when it is an email address
    /// (`mailer@example.com`); otherwise (`apikey`, access key ids) the
    /// recipient address sends to itself.
    pub fn with_transport(
        transport: Arc<dyn MailTransport>,
        settings: &SmtpSettings,
    ) -> Result<Self, SmtpError> {
        let recipient: Mailbox = settings.to.parse()?;
        let sender = settings
            .user
            .parse::<Address>()
            .unwrap_or_else(|_| recipient.email.clone());

        Ok(Self {
            transport,
            sender,
            recipient,
        })
    }

    /// Envelope sender address
    pub fn sender(&self) -> &Address {
        &self.sender
    }

    /// Compose the email for a submission
    ///
    /// The mail is sent from the sender address under the submitter's name,
    /// with `Reply-To` pointing at the submitter.
    pub fn build_message(&self, submission: &ContactSubmission) -> Result<Message, SmtpError> {
        let submitter = Mailbox::new(Some(submission.name.clone()), submission.email.parse()?);
        let from = Mailbox::new(Some(submission.name.clone()), self.sender.clone());

        let message = Message::builder()
            .from(from)
            .reply_to(submitter)
            .to(self.recipient.clone())
            .subject(submission.subject())
            .multipart(MultiPart::alternative_plain_html(
                plain_body(submission),
                html_body(submission),
            ))?;
        Ok(message)
    }

    /// Send a submission
    pub async fn send(&self, submission: &ContactSubmission) -> Result<(), SmtpError> {
        let message = self.build_message(submission)?;
        self.transport.deliver(message).await
    }
}

fn plain_body(submission: &ContactSubmission) -> String {
    format!(
        "Name: {}\nEmail: {}\nService: {}\n\nMessage:\n{}",
        submission.name,
        submission.email,
        submission.service_label(),
        submission.message
    )
}

fn html_body(submission: &ContactSubmission) -> String {
    format!(
        "<p><strong>Name:</strong> {}</p><p><strong>Email:</strong> {}</p>\
         <p><strong>Service:</strong> {}</p><p><strong>Message:</strong></p><p>{}</p>",
        escape_html(&submission.name),
        escape_html(&submission.email),
        escape_html(submission.service_label()),
        escape_html(&submission.message).replace('\n', "<br/>")
    )
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
