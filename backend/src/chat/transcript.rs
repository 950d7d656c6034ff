//! Chat transcripts
//!
//! A transcript is assembled once per chat request from the prior history, the
//! visitor's new message and the generated reply. It only lives for the
//! duration of the forwarding call.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use crate::chat::models::{ChatTurn, ConversationHistory};

/// Transcript metadata
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptMeta {
    /// Where the conversation happened
    pub source: String,
    /// When the transcript was assembled
    #[serde(serialize_with = "serialize_rfc3339")]
    pub when: DateTime<Utc>,
}

/// Structured record of one chat exchange
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    /// Metadata block
    pub meta: TranscriptMeta,
    /// Full conversation including the latest exchange
    pub conversation: Vec<ChatTurn>,
}

impl Transcript {
    /// Assemble a transcript stamped with the current time
    pub fn new(
        source: impl Into<String>,
        history: &ConversationHistory,
        message: &str,
        reply: &str,
    ) -> Self {
        Self::at(source, Utc::now(), history, message, reply)
    }

    /// Assemble a transcript with an explicit timestamp
    pub fn at(
        source: impl Into<String>,
        when: DateTime<Utc>,
        history: &ConversationHistory,
        message: &str,
        reply: &str,
    ) -> Self {
        let mut conversation = Vec::with_capacity(history.len() + 2);
        conversation.extend(history.iter().cloned());
        conversation.push(ChatTurn::user(message));
        conversation.push(ChatTurn::assistant(reply));

        Self {
            meta: TranscriptMeta {
                source: source.into(),
                when,
            },
            conversation,
        }
    }

    /// Pretty-printed JSON used as the body of the forwarded email
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn serialize_rfc3339<S>(when: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&when.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_transcript_appends_latest_exchange() {
        let history = vec![ChatTurn::user("hi"), ChatTurn::assistant("hello!")];
        let transcript = Transcript::new("site chat", &history, "pricing?", "It depends.");

        assert_eq!(transcript.conversation.len(), 4);
        assert_eq!(transcript.conversation[2], ChatTurn::user("pricing?"));
        assert_eq!(transcript.conversation[3], ChatTurn::assistant("It depends."));
        assert_eq!(transcript.meta.source, "site chat");
    }

    #[test]
    fn test_transcript_json_shape() {
        let when = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let transcript = Transcript::at("site chat", when, &Vec::new(), "hello", "hi there");
        let value = serde_json::to_value(&transcript).unwrap();

        assert_eq!(
            value,
            json!({
                "meta": {"source": "site chat", "when": "2026-01-02T03:04:05.000Z"},
                "conversation": [
                    {"role": "user", "content": "hello"},
                    {"role": "assistant", "content": "hi there"},
                ],
            })
        );
        assert!(transcript.to_pretty_json().unwrap().contains("\n  \"meta\""));
    }
}
