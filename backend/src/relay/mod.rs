//! Outbound delivery
//!
//! Forwarding of chat transcripts and delivery of contact submissions through
//! Web3Forms, with SMTP as the contact form's last resort.

pub mod contact;
pub mod forwarder;
pub mod smtp;
pub mod web3forms;

pub use contact::{ContactRelay, ContactSubmission, DeliveryChannel, DeliveryOutcome};
pub use forwarder::TranscriptForwarder;
pub use smtp::{MailTransport, SmtpError, SmtpRelay};
pub use web3forms::{ForwardError, ForwardFailure, Web3FormsClient};

/// Brand name used in email subjects
pub const BRAND: &str = "NANO NUX";
