// State management module
// Holds the per-process components shared by every request

pub mod app_state;

pub use app_state::{AppState, SharedState};
