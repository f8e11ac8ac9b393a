//! API module
//!
//! Contains HTTP request handlers for the chat, analytics and system endpoints

pub mod analytics;
pub mod chat;
pub mod system;
