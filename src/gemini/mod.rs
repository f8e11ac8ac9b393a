//! Gemini upstream integration
//!
//! Typed wire format and HTTP client for the generative-language API.

pub mod client;
pub mod types;

pub use client::{build_request, GeminiClient};
