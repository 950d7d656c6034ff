//! Chat data models
//!
//! Defines conversation turns and the normalization of caller-supplied history.

use serde::Serialize;
use serde_json::Value;

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Message from the website visitor
    User,
    /// Message from the assistant
    Assistant,
}

impl ChatRole {
    /// Convert the role to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

impl From<&str> for ChatRole {
    fn from(s: &str) -> Self {
        match s {
            "assistant" => ChatRole::Assistant,
            _ => ChatRole::User,
        }
    }
}

/// A single turn of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatTurn {
    /// Who said it
    pub role: ChatRole,
    /// What was said
    pub content: String,
}

impl ChatTurn {
    /// Create a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered, chronological conversation history
pub type ConversationHistory = Vec<ChatTurn>;

/// Normalize untrusted history JSON into a typed history
///
/// Anything other than an array yields an empty history. Each item keeps its
/// position; unknown roles become `user` and the content is taken from `text`,
/// then `content`, then the item itself.
pub fn normalize_history(raw: Option<&Value>) -> ConversationHistory {
    match raw {
        Some(Value::Array(items)) => items.iter().map(normalize_turn).collect(),
        _ => Vec::new(),
    }
}

fn normalize_turn(item: &Value) -> ChatTurn {
    let role = item
        .get("role")
        .and_then(Value::as_str)
        .map(ChatRole::from)
        .unwrap_or(ChatRole::User);

    let content = item
        .get("text")
        .filter(|v| !v.is_null())
        .or_else(|| item.get("content").filter(|v| !v.is_null()))
        .unwrap_or(item);

    ChatTurn {
        role,
        content: stringify(content),
    }
}

/// Strings are taken verbatim, everything else as compact JSON text
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
