//! Application state management
//!
//! Per-client conversation sessions and the shared handler state.

pub mod app_state;
pub mod session;

pub use app_state::{AppState, SessionStore, DEFAULT_SESSION_ID};
pub use session::{AnalyticsSnapshot, ChatMessage, ChatSession, MessageRole};
