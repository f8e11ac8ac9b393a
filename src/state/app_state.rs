//! Application state
//!
//! Shared state handed to every handler. Sessions are keyed per client
//! behind a single `RwLock`; the Gemini client and persona are immutable
//! after startup and shared without locking.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::error::AppError;
use crate::gemini::GeminiClient;
use crate::state::session::ChatSession;

/// Session key used when a client does not supply one
pub const DEFAULT_SESSION_ID: &str = "default";

/// All sessions, keyed by client-supplied session id
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<String, ChatSession>,
}

impl SessionStore {
    /// Get or create the session for the given id
    pub fn session_mut(&mut self, id: &str) -> &mut ChatSession {
        self.sessions.entry(id.to_string()).or_default()
    }

    /// Read-only view of a session, if it exists
    pub fn session(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.get(id)
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no session exists yet
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Shared application state, cheap to clone per request
#[derive(Clone)]
pub struct AppState {
    /// Per-client conversation sessions
    pub sessions: Arc<RwLock<SessionStore>>,
    /// Upstream client; `None` when no API key is configured
    gemini: Option<GeminiClient>,
    /// Persona instruction injected into every upstream request
    pub persona: Arc<str>,
    /// Model name, exposed read-only through `/api/config`
    pub model: String,
}

impl AppState {
    /// Build state from configuration
    ///
    /// A missing API key is not fatal here: the state is still usable and
    /// chat-dependent routes fail per-request with a configuration error.
    pub fn from_config(config: &Config) -> Self {
        let gemini = match GeminiClient::from_config(&config.gemini) {
            Ok(client) => Some(client),
            Err(_) => None,
        };
        Self {
            sessions: Arc::new(RwLock::new(SessionStore::default())),
            gemini,
            persona: Arc::from(config.persona.as_str()),
            model: config.gemini.model.clone(),
        }
    }

    /// State with an explicit client, used by tests to point at a mock server
    pub fn with_client(client: GeminiClient, persona: impl Into<String>) -> Self {
        let persona = persona.into();
        Self {
            sessions: Arc::new(RwLock::new(SessionStore::default())),
            model: client.model().to_string(),
            gemini: Some(client),
            persona: Arc::from(persona.as_str()),
        }
    }

    /// Whether an API key was configured at startup
    pub fn key_configured(&self) -> bool {
        self.gemini.is_some()
    }

    /// The upstream client, or the configuration error every chat route maps to
    pub fn gemini(&self) -> Result<&GeminiClient, AppError> {
        self.gemini.as_ref().ok_or(AppError::ApiKeyMissing)
    }
}
