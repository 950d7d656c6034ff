//! Contact form API
//!
//! Validates a submission and hands it to the delivery chain. The status code
//! tells apart the three outcomes: delivered (200), nothing configured (501)
//! and every configured channel failed (502).

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::AppError;
use crate::relay::contact::DeliveryDiagnostics;
use crate::relay::{ContactSubmission, DeliveryOutcome};
use crate::state::{AppState, SharedState};

const NOT_CONFIGURED_MESSAGE: &str = "Email sending is not configured. Set WEB3FORMS_ACCESS_KEY for Web3Forms or SMTP_HOST/SMTP_PORT/SMTP_USER/SMTP_PASS and EMAIL_TO for SMTP.";
const DELIVERY_FAILED_MESSAGE: &str = "Email delivery failed. Please try again later.";

/// Incoming contact-form submission
#[derive(Debug, Default, Deserialize)]
pub struct ContactRequest {
    /// Visitor's name
    #[serde(default)]
    pub name: Option<String>,
    /// Visitor's email address
    #[serde(default)]
    pub email: Option<String>,
    /// Service of interest
    #[serde(default)]
    pub service: Option<String>,
    /// Message body
    #[serde(default)]
    pub message: Option<String>,
}

impl ContactRequest {
    /// Check required fields and produce a submission
    pub fn validate(self) -> Result<ContactSubmission, AppError> {
        let required = |field: Option<String>| field.filter(|v| !v.trim().is_empty());

        match (
            required(self.name),
            required(self.email),
            required(self.message),
        ) {
            (Some(name), Some(email), Some(message)) => Ok(ContactSubmission {
                name: name.trim().to_string(),
                email: email.trim().to_string(),
                service: required(self.service).map(|s| s.trim().to_string()),
                message,
            }),
            _ => Err(AppError::MissingField(
                "Missing required fields".to_string(),
            )),
        }
    }
}

/// Contact endpoint response
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    /// Whether the submission was delivered
    pub ok: bool,
    /// Human-readable outcome
    pub message: String,
    /// Channel configuration report, on failure only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<DeliveryDiagnostics>,
}

/// Validate and deliver a submission
pub async fn handle_contact(
    state: &AppState,
    request: ContactRequest,
) -> Result<(StatusCode, ContactResponse), AppError> {
    let submission = request.validate()?;
    let diagnostics = state.contact.diagnostics();

    info!(
        name = %submission.name,
        email = %submission.email,
        service = ?submission.service,
        message_preview = %submission.message.chars().take(200).collect::<String>(),
        web3forms_key_present = diagnostics.web3forms_key_present,
        web3forms_key_length = diagnostics.web3forms_key_length,
        smtp_configured = diagnostics.smtp_configured,
        "Contact submission received"
    );

    let reply = match state.contact.deliver(&submission).await {
        DeliveryOutcome::Sent(channel) => (
            StatusCode::OK,
            ContactResponse {
                ok: true,
                message: channel.confirmation().to_string(),
                diagnostics: None,
            },
        ),
        DeliveryOutcome::NotConfigured => {
            warn!("Contact submission dropped: no delivery channel configured");
            (
                StatusCode::NOT_IMPLEMENTED,
                ContactResponse {
                    ok: false,
                    message: NOT_CONFIGURED_MESSAGE.to_string(),
                    diagnostics: Some(diagnostics),
                },
            )
        }
        DeliveryOutcome::Failed(failures) => {
            warn!(failures = ?failures, "Contact submission could not be delivered");
            (
                StatusCode::BAD_GATEWAY,
                ContactResponse {
                    ok: false,
                    message: DELIVERY_FAILED_MESSAGE.to_string(),
                    diagnostics: Some(diagnostics),
                },
            )
        }
    };

    Ok(reply)
}

/// POST /api/contact
pub async fn contact(
    State(state): State<SharedState>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ContactResponse>), AppError> {
    let Json(request) = payload?;
    let (status, body) = handle_contact(&state, request).await?;
    Ok((status, Json(body)))
}
