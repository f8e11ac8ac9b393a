//! Chat API
//!
//! The chat endpoint drives the whole pipeline: validate the message,
//! append it to the session, send the full ordered history plus the persona
//! instruction upstream, sanitize the reply, store it, and update
//! analytics. Clearing a session resets history, analytics and the clock.

use std::time::Instant;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::classify::{topics_for, Category};
use crate::error::AppError;
use crate::sanitize::sanitize;
use crate::state::{AppState, DEFAULT_SESSION_ID};

#[allow(missing_docs)]
#[derive(Deserialize)]
pub struct ChatRequest {
    /// Defaulted so a body without `message` reaches the empty-message
    /// validation instead of dying in the extractor
    #[serde(default)]
    pub message: String,
    /// Optional session key; omitted by the single-user UI
    #[serde(default)]
    pub session_id: Option<String>,
    /// Optional client-side message tag, accepted but not interpreted
    #[serde(default, rename = "type")]
    pub message_type: Option<String>,
}

#[allow(missing_docs)]
#[derive(Serialize)]
pub struct ChatResponse {
    pub response: String,
    /// Upstream round-trip time in seconds
    pub response_time: f64,
    /// 1-based sequence id of this exchange within the session
    pub message_id: u64,
}

#[allow(missing_docs)]
#[derive(Deserialize, Default)]
pub struct ClearRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[allow(missing_docs)]
#[derive(Serialize)]
pub struct ClearResponse {
    pub message: String,
}

/// Handle a chat message
///
/// Fails fast with a configuration error when no API key is set, and with
/// a client error on an empty message, before any upstream call is made.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let gemini = state.gemini()?.clone();

    let message = request.message.trim().to_string();
    if message.is_empty() {
        return Err(AppError::EmptyMessage);
    }

    let session_id = request
        .session_id
        .unwrap_or_else(|| DEFAULT_SESSION_ID.to_string());

    if let Some(tag) = &request.message_type {
        tracing::debug!(tag = %tag, "Client message tag");
    }

    // Append the user turn and take the full history while holding the
    // write lock; the upstream call happens outside it.
    let (message_id, contents, topics) = {
        let mut store = state.sessions.write().await;
        let session = store.session_mut(&session_id);
        let message_id = session.record_user(message.clone());
        let topics = topics_for(&message);
        session.record_topics(topics.iter().copied());
        (message_id, session.history_contents(), topics)
    };

    info!(
        session_id = %session_id,
        message_id = message_id,
        turns = contents.len(),
        "Chat request received"
    );

    let start = Instant::now();
    let reply = gemini.generate(contents, &state.persona).await?;
    let elapsed = start.elapsed();

    let clean = sanitize(&reply);

    // Best-effort single-label categorization; failures degrade silently.
    let category = match gemini.classify(&message, &Category::labels()).await {
        Ok(label) => Category::from_label(&label),
        Err(e) => {
            warn!(error = %e, "Classification call failed, using keyword fallback");
            topics
                .first()
                .map(|t| Category::from_label(t))
                .unwrap_or(Category::General)
        }
    };

    {
        let mut store = state.sessions.write().await;
        let session = store.session_mut(&session_id);
        session.record_model(clean.clone(), elapsed.as_millis() as u64);
        session.record_category(category);
    }

    info!(
        session_id = %session_id,
        message_id = message_id,
        duration_ms = elapsed.as_millis(),
        category = %category,
        "Chat exchange completed"
    );

    Ok(Json(ChatResponse {
        response: clean,
        response_time: elapsed.as_secs_f64(),
        message_id,
    }))
}

/// Reset a session: history, analytics and the session clock
///
/// Accepts an empty body; the default session is cleared in that case.
pub async fn clear(
    State(state): State<AppState>,
    request: Option<Json<ClearRequest>>,
) -> Json<ClearResponse> {
    let session_id = request
        .and_then(|Json(r)| r.session_id)
        .unwrap_or_else(|| DEFAULT_SESSION_ID.to_string());

    let mut store = state.sessions.write().await;
    store.session_mut(&session_id).clear();

    info!(session_id = %session_id, "Chat cleared");

    Json(ClearResponse {
        message: "Chat cleared successfully".to_string(),
    })
}
