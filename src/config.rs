//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults. The Gemini API key is optional at startup: the
//! server still comes up without one, but every chat-dependent route
//! answers with a configuration error until it is set.

use std::env;
use std::fs;

use tracing::warn;

/// Default persona instruction used when no `PERSONA_PATH` is configured.
///
/// The persona is plain configuration data; the chat pipeline never depends
/// on its content, only on the fact that a system instruction exists.
const DEFAULT_PERSONA: &str = "\
You are a professional assistant representing a job candidate. Answer \
questions about the candidate's background, skills, and experience using \
only the resume data you have been given. If asked about something not \
covered, say you don't have that information and suggest a related topic.

Never use markdown formatting (no *, **, bullets, headings, or backticks). \
Write plain, natural prose in the first person, in complete sentences.";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Upstream Gemini configuration
    pub gemini: GeminiConfig,
    /// Persona instruction injected into every upstream request
    pub persona: String,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Upstream Gemini API configuration
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key; `None` disables all chat-dependent routes
    pub api_key: Option<String>,
    /// Model name used for chat and classification calls
    pub model: String,
    /// Hard timeout for a single upstream call (in seconds)
    pub timeout_secs: u64,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never leak the key into logs.
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<set>"))
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty() && k != "your_gemini_api_key_here");

        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            gemini: GeminiConfig {
                api_key,
                model: env::var("GEMINI_MODEL")
                    .unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
                timeout_secs: env::var("GEMINI_TIMEOUT_SECS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(30),
            },
            persona: load_persona(),
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Load the persona instruction from `PERSONA_PATH`, falling back to the
/// built-in default template when unset or unreadable.
fn load_persona() -> String {
    match env::var("PERSONA_PATH") {
        Ok(path) => match fs::read_to_string(&path) {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!(path = %path, "Persona file is empty, using default persona");
                DEFAULT_PERSONA.to_string()
            }
            Err(e) => {
                warn!(path = %path, error = %e, "Failed to read persona file, using default persona");
                DEFAULT_PERSONA.to_string()
            }
        },
        Err(_) => DEFAULT_PERSONA.to_string(),
    }
}
