//! Chat module
//!
//! Conversation models, transcripts and reply generation.

pub mod models;
pub mod prompt;
pub mod reply;
pub mod transcript;

pub use models::{normalize_history, ChatRole, ChatTurn, ConversationHistory};
pub use reply::ReplyGenerator;
pub use transcript::Transcript;
