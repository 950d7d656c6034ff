//! Chat API
//!
//! Flow: visitor message -> reply generator (provider chain or fallback) ->
//! transcript forwarded to Web3Forms -> reply returned.
//!
//! Forwarding never affects the status code; its outcome is reported in the
//! `forwarded` flag and, on failure, the `detail` object.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::chat::{normalize_history, Transcript};
use crate::error::AppError;
use crate::relay::ForwardFailure;
use crate::state::{AppState, SharedState};

/// Incoming chat request
///
/// Both fields stay untyped until validated by [`handle_chat`].
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    /// The visitor's new message
    #[serde(default)]
    pub message: Option<Value>,
    /// Prior turns, oldest first
    #[serde(default)]
    pub history: Option<Value>,
}

/// Chat response
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Always `true` for a generated reply
    pub ok: bool,
    /// The assistant's reply
    pub reply: String,
    /// Whether the transcript reached the form relay
    pub forwarded: bool,
    /// Why forwarding did not happen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<ForwardFailure>,
}

/// Validate the request, generate a reply and forward the transcript
pub async fn handle_chat(state: &AppState, request: ChatRequest) -> Result<ChatResponse, AppError> {
    let message = request
        .message
        .and_then(message_text)
        .ok_or_else(|| AppError::MissingField("Missing message".to_string()))?;
    let history = normalize_history(request.history.as_ref());

    info!(
        message_len = message.len(),
        history_len = history.len(),
        "Chat request received"
    );

    let reply = state.replies.generate_reply(&history, &message).await;

    let transcript = Transcript::new(
        state.config.forwarding.transcript_source.clone(),
        &history,
        &message,
        &reply,
    );
    let detail = state
        .forwarder
        .forward(&transcript)
        .await
        .err()
        .map(|e| e.to_failure());

    Ok(ChatResponse {
        ok: true,
        reply,
        forwarded: detail.is_none(),
        detail,
    })
}

/// Text of a message value
///
/// Strings are used as sent; other present values (numbers, objects, `true`)
/// are sent as their JSON text. Blank strings, `null`, `false` and zero count
/// as missing.
fn message_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text),
        Value::String(_) | Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// POST /api/chat
pub async fn chat(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload?;
    handle_chat(&state, request).await.map(Json)
}
