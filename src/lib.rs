//! Resume Chat Backend Library
//!
//! This library exposes modules for testing and external use.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod classify;
pub mod config;
pub mod error;
pub mod gemini;
pub mod sanitize;
pub mod state;
