//! Integration tests for the chat endpoint
//!
//! These tests drive the handler end to end with mock provider and Web3Forms
//! servers:
//! 1. Fallback reply with nothing configured
//! 2. Provider priority and fallthrough
//! 3. Forwarding outcome reported as metadata only

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mockito::{Matcher, Server, ServerGuard};
use nanonux_backend::api::chat::{chat, handle_chat, ChatRequest};
use nanonux_backend::chat::prompt::FALLBACK_REPLY;
use nanonux_backend::config::Config;
use nanonux_backend::state::AppState;
use serde_json::{json, Value};
use serial_test::serial;

const GEMINI_PATH: &str = "/models/gemini-2.5-flash-lite:generateContent";

/// Helper to build state from a set of environment-style variables
fn create_test_state(vars: &[(&str, String)]) -> Arc<AppState> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    let config = Config::from_lookup(|key| vars.get(key).cloned());
    AppState::from_config(config).unwrap().shared()
}

fn hello_request() -> ChatRequest {
    ChatRequest {
        message: Some(json!("hello")),
        history: None,
    }
}

async fn gemini_mock(server: &mut ServerGuard, status: usize, body: &str) -> mockito::Mock {
    server
        .mock("POST", GEMINI_PATH)
        .match_query(Matcher::UrlEncoded("key".into(), "gemini-key".into()))
        .with_status(status)
        .with_body(body)
        .create_async()
        .await
}

async fn openai_mock(server: &mut ServerGuard, status: usize, body: &str) -> mockito::Mock {
    server
        .mock("POST", "/chat/completions")
        .with_status(status)
        .with_body(body)
        .create_async()
        .await
}

async fn response_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_hello_without_configuration_returns_fallback() {
    let state = create_test_state(&[]);

    let response = chat(State(state), Ok(Json(hello_request())))
        .await
        .into_response();
    let (status, body) = response_json(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["reply"], json!(FALLBACK_REPLY));
    assert_eq!(body["forwarded"], json!(false));
    assert_eq!(body["detail"]["reason"], json!("no_key"));
}

#[tokio::test]
async fn test_missing_message_returns_400_with_error() {
    let state = create_test_state(&[]);

    let response = chat(State(state), Ok(Json(ChatRequest::default())))
        .await
        .into_response();
    let (status, body) = response_json(response).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Missing message"));
}

#[tokio::test]
#[serial]
async fn test_primary_provider_reply_is_used() {
    let mut gemini = Server::new_async().await;
    let mut openai = Server::new_async().await;
    let gemini_call = gemini_mock(
        &mut gemini,
        200,
        r#"{"candidates": [{"content": {"parts": [{"text": "  From Gemini  "}], "role": "model"}}]}"#,
    )
    .await;
    let openai_call = server_never_called(&mut openai).await;

    let state = create_test_state(&[
        ("GEMINI_API_KEY", "gemini-key".into()),
        ("GEMINI_API_BASE_URL", gemini.url()),
        ("OPENAI_API_KEY", "openai-key".into()),
        ("OPENAI_API_BASE_URL", openai.url()),
    ]);

    let response = handle_chat(&state, hello_request()).await.unwrap();

    gemini_call.assert_async().await;
    openai_call.assert_async().await;
    assert_eq!(response.reply, "From Gemini");
}

async fn server_never_called(server: &mut ServerGuard) -> mockito::Mock {
    server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await
}

#[tokio::test]
#[serial]
async fn test_primary_failure_falls_through_to_secondary() {
    let mut gemini = Server::new_async().await;
    let mut openai = Server::new_async().await;
    let gemini_call = gemini_mock(&mut gemini, 500, r#"{"error": "boom"}"#).await;
    let openai_call = openai_mock(
        &mut openai,
        200,
        r#"{"choices": [{"message": {"role": "assistant", "content": "From OpenAI"}}]}"#,
    )
    .await;

    let state = create_test_state(&[
        ("GEMINI_API_KEY", "gemini-key".into()),
        ("GEMINI_API_BASE_URL", gemini.url()),
        ("OPENAI_API_KEY", "openai-key".into()),
        ("OPENAI_API_BASE_URL", openai.url()),
    ]);

    let response = handle_chat(&state, hello_request()).await.unwrap();

    gemini_call.assert_async().await;
    openai_call.assert_async().await;
    assert_eq!(response.reply, "From OpenAI");
}

#[tokio::test]
#[serial]
async fn test_both_providers_failing_returns_fallback() {
    let mut gemini = Server::new_async().await;
    let mut openai = Server::new_async().await;
    let _gemini_call = gemini_mock(&mut gemini, 200, r#"{"candidates": []}"#).await;
    let _openai_call = openai_mock(&mut openai, 503, "unavailable").await;

    let state = create_test_state(&[
        ("GEMINI_API_KEY", "gemini-key".into()),
        ("GEMINI_API_BASE_URL", gemini.url()),
        ("OPENAI_API_KEY", "openai-key".into()),
        ("OPENAI_API_BASE_URL", openai.url()),
    ]);

    let response = handle_chat(&state, hello_request()).await.unwrap();
    assert_eq!(response.reply, FALLBACK_REPLY);
}

#[tokio::test]
#[serial]
async fn test_transcript_forwarded_with_full_conversation() {
    let mut gemini = Server::new_async().await;
    let mut web3forms = Server::new_async().await;
    let _gemini_call = gemini_mock(
        &mut gemini,
        200,
        r#"{"candidates": [{"content": {"parts": [{"text": "We can help."}]}}]}"#,
    )
    .await;
    let forward_call = web3forms
        .mock("POST", "/submit")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({"access_key": "w3f-key", "redirect": ""})),
            Matcher::Regex("earlier question".to_string()),
            Matcher::Regex("We can help.".to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"success": true}"#)
        .create_async()
        .await;

    let state = create_test_state(&[
        ("GEMINI_API_KEY", "gemini-key".into()),
        ("GEMINI_API_BASE_URL", gemini.url()),
        ("WEB3FORMS_ACCESS_KEY", "w3f-key".into()),
        ("WEB3FORMS_ENDPOINT", format!("{}/submit", web3forms.url())),
    ]);

    let request = ChatRequest {
        message: Some(json!("Can you build an app?")),
        history: Some(json!([
            {"role": "user", "text": "earlier question"},
            {"role": "assistant", "text": "earlier answer"},
        ])),
    };
    let response = handle_chat(&state, request).await.unwrap();

    forward_call.assert_async().await;
    assert_eq!(response.reply, "We can help.");
    assert!(response.forwarded);
    assert!(response.detail.is_none());
}

#[tokio::test]
#[serial]
async fn test_forwarding_failure_keeps_status_200() {
    let mut web3forms = Server::new_async().await;
    let forward_call = web3forms
        .mock("POST", "/submit")
        .with_status(429)
        .with_body(r#"{"success": false, "message": "Too many requests"}"#)
        .create_async()
        .await;

    let state = create_test_state(&[
        ("WEB3FORMS_ACCESS_KEY", "w3f-key".into()),
        ("WEB3FORMS_ENDPOINT", format!("{}/submit", web3forms.url())),
    ]);

    let response = chat(State(state), Ok(Json(hello_request())))
        .await
        .into_response();
    let (status, body) = response_json(response).await;

    forward_call.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["reply"], json!(FALLBACK_REPLY));
    assert_eq!(body["forwarded"], json!(false));
    assert_eq!(body["detail"]["reason"], json!("web3forms_error"));
    assert_eq!(body["detail"]["detail"]["message"], json!("Too many requests"));
}

#[tokio::test]
#[serial]
async fn test_repeated_requests_produce_same_reply() {
    let mut gemini = Server::new_async().await;
    let gemini_call = gemini
        .mock("POST", GEMINI_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"candidates": [{"content": {"parts": [{"text": "Stable"}]}}]}"#)
        .expect(2)
        .create_async()
        .await;

    let state = create_test_state(&[
        ("GEMINI_API_KEY", "gemini-key".into()),
        ("GEMINI_API_BASE_URL", gemini.url()),
    ]);

    let request = || ChatRequest {
        message: Some(json!("hello")),
        history: Some(json!([{"role": "user", "content": "hi"}])),
    };
    let first = handle_chat(&state, request()).await.unwrap();
    let second = handle_chat(&state, request()).await.unwrap();

    gemini_call.assert_async().await;
    assert_eq!(first.reply, second.reply);
}
