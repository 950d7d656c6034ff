//! NANO NUX website backend library
//!
//! Chat relay with a multi-provider reply chain and contact-form delivery.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod providers;
pub mod relay;
/// Application state management
///
/// Holds the components built from configuration at startup.
pub mod state;
