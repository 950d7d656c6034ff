//! API module
//!
//! Contains HTTP request handlers for the chat and contact endpoints

pub mod chat;
pub mod contact;
pub mod health;
