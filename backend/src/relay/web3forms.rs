//! Web3Forms client
//!
//! Web3Forms accepts a JSON form payload and emails it to the address tied to
//! the access key. Every failure is returned as a [`ForwardError`] carrying a
//! stable reason code; nothing here panics or propagates past the caller.

use std::time::Duration;

use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// Web3Forms sits behind a WAF that rejects some non-browser agents.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/118.0.0.0 Safari/537.36";

/// Why a submission did not go through
#[derive(Debug, Error)]
pub enum ForwardError {
    /// No access key configured; no request was made
    #[error("Web3Forms access key not configured")]
    NoKey,

    /// Web3Forms answered with a failure
    #[error("Web3Forms returned status {status}")]
    Upstream {
        /// HTTP status code
        status: u16,
        /// Response body, parsed as JSON when possible, raw text otherwise
        detail: Value,
    },

    /// The request never completed (connect error, timeout, unreadable body)
    #[error("Web3Forms request failed: {0}")]
    Transport(String),

    /// The payload could not be encoded
    #[error("Failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ForwardError {
    /// Stable reason code reported to clients
    pub fn reason(&self) -> &'static str {
        match self {
            ForwardError::NoKey => "no_key",
            ForwardError::Upstream { .. } => "web3forms_error",
            ForwardError::Transport(_) => "web3forms_fetch_error",
            ForwardError::Encode(_) => "encode_error",
        }
    }

    /// Diagnostic detail, if any
    pub fn detail(&self) -> Option<Value> {
        match self {
            ForwardError::NoKey => None,
            ForwardError::Upstream { detail, .. } => Some(detail.clone()),
            ForwardError::Transport(msg) => Some(Value::String(msg.clone())),
            ForwardError::Encode(e) => Some(Value::String(e.to_string())),
        }
    }

    /// Response metadata form: `{ok: false, reason, detail?}`
    pub fn to_failure(&self) -> ForwardFailure {
        ForwardFailure {
            ok: false,
            reason: self.reason(),
            detail: self.detail(),
        }
    }
}

/// Serializable view of a forwarding failure
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ForwardFailure {
    /// Always `false`
    pub ok: bool,
    /// Reason code
    pub reason: &'static str,
    /// Diagnostic detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

/// One form submission
#[derive(Debug, Clone)]
pub struct Submission {
    /// Email subject
    pub subject: String,
    /// Display name of the sender
    pub sender_name: String,
    /// Sender address
    pub sender_email: String,
    /// Message body
    pub message: String,
}

#[derive(Serialize, Debug)]
struct SubmitBody<'a> {
    access_key: &'a str,
    subject: &'a str,
    sender_name: &'a str,
    sender_email: &'a str,
    message: &'a str,
    redirect: &'a str,
}

/// Web3Forms API client
#[derive(Clone)]
pub struct Web3FormsClient {
    client: reqwest::Client,
    access_key: Option<String>,
    endpoint: String,
    timeout: Duration,
}

impl Web3FormsClient {
    /// Create a client using the shared HTTP client
    pub fn new(
        client: reqwest::Client,
        access_key: Option<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            access_key,
            endpoint: endpoint.into(),
            timeout,
        }
    }

    /// Whether an access key is configured
    pub fn is_configured(&self) -> bool {
        self.access_key.is_some()
    }

    /// Length of the configured access key, for diagnostics
    pub fn key_length(&self) -> usize {
        self.access_key.as_ref().map(String::len).unwrap_or(0)
    }

    /// Submit a form payload
    pub async fn submit(&self, submission: &Submission) -> Result<(), ForwardError> {
        let access_key = self.access_key.as_deref().ok_or(ForwardError::NoKey)?;

        let body = SubmitBody {
            access_key,
            subject: &submission.subject,
            sender_name: &submission.sender_name,
            sender_email: &submission.sender_email,
            message: &submission.message,
            redirect: "",
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| ForwardError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ForwardError::Transport(e.to_string()))?;
        let parsed = serde_json::from_str::<Value>(&text).ok();

        tracing::debug!(
            status = status.as_u16(),
            body_len = text.len(),
            "Web3Forms responded"
        );

        // A 200 can still carry `"success": false`
        let rejected = parsed
            .as_ref()
            .and_then(|v| v.get("success"))
            .and_then(Value::as_bool)
            == Some(false);

        if !status.is_success() || rejected {
            return Err(ForwardError::Upstream {
                status: status.as_u16(),
                detail: parsed.unwrap_or(Value::String(text)),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use serial_test::serial;

    fn submission() -> Submission {
        Submission {
            subject: "Hello".into(),
            sender_name: "Jane".into(),
            sender_email: "jane@example.com".into(),
            message: "Body".into(),
        }
    }

    fn client(endpoint: &str, key: Option<&str>) -> Web3FormsClient {
        Web3FormsClient::new(
            reqwest::Client::new(),
            key.map(str::to_string),
            endpoint,
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    #[serial]
    async fn test_submit_without_key_makes_no_request() {
        let mut server = Server::new_async().await;
        let mock = server.mock("POST", "/submit").expect(0).create_async().await;

        let result = client(&format!("{}/submit", server.url()), None)
            .submit(&submission())
            .await;

        mock.assert_async().await;
        let err = result.unwrap_err();
        assert_eq!(err.reason(), "no_key");
        assert_eq!(err.to_failure().detail, None);
    }

    #[tokio::test]
    #[serial]
    async fn test_submit_sends_envelope() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/submit")
            .match_header("accept", "application/json")
            .match_body(Matcher::Json(json!({
                "access_key": "w3f-key",
                "subject": "Hello",
                "sender_name": "Jane",
                "sender_email": "jane@example.com",
                "message": "Body",
                "redirect": "",
            })))
            .with_status(200)
            .with_body(r#"{"success": true, "message": "Email sent"}"#)
            .create_async()
            .await;

        let result = client(&format!("{}/submit", server.url()), Some("w3f-key"))
            .submit(&submission())
            .await;

        mock.assert_async().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    #[serial]
    async fn test_submit_error_status_keeps_json_detail() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/submit")
            .with_status(403)
            .with_body(r#"{"success": false, "message": "Invalid access key"}"#)
            .create_async()
            .await;

        let err = client(&format!("{}/submit", server.url()), Some("bad"))
            .submit(&submission())
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.reason(), "web3forms_error");
        assert_eq!(
            err.detail(),
            Some(json!({"success": false, "message": "Invalid access key"}))
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_submit_error_status_keeps_raw_text() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/submit")
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create_async()
            .await;

        let err = client(&format!("{}/submit", server.url()), Some("key"))
            .submit(&submission())
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, ForwardError::Upstream { status: 502, .. }));
        assert_eq!(err.detail(), Some(json!("<html>Bad Gateway</html>")));
    }

    #[tokio::test]
    #[serial]
    async fn test_submit_success_false_is_a_failure() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/submit")
            .with_status(200)
            .with_body(r#"{"success": false, "message": "Spam detected"}"#)
            .create_async()
            .await;

        let err = client(&format!("{}/submit", server.url()), Some("key"))
            .submit(&submission())
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.reason(), "web3forms_error");
    }

    #[tokio::test]
    async fn test_submit_unreachable_endpoint() {
        // Port 9 (discard) is closed on test machines
        let err = client("http://127.0.0.1:9/submit", Some("key"))
            .submit(&submission())
            .await
            .unwrap_err();

        assert_eq!(err.reason(), "web3forms_fetch_error");
        assert!(err.detail().is_some());
    }

    #[test]
    fn test_failure_serialization() {
        let failure = ForwardError::NoKey.to_failure();
        assert_eq!(
            serde_json::to_value(&failure).unwrap(),
            json!({"ok": false, "reason": "no_key"})
        );
    }
}
