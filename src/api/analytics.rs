//! Analytics API
//!
//! Read-only view of a session's derived analytics.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::state::{AnalyticsSnapshot, AppState, ChatSession, DEFAULT_SESSION_ID};

#[allow(missing_docs)]
#[derive(Deserialize, Default)]
pub struct AnalyticsQuery {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Report counts, mean latency, topic set and category breakdown
///
/// A session that was never written to reports the empty snapshot.
pub async fn analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Json<AnalyticsSnapshot> {
    let session_id = query
        .session_id
        .unwrap_or_else(|| DEFAULT_SESSION_ID.to_string());

    let store = state.sessions.read().await;
    let snapshot = store
        .session(&session_id)
        .map(ChatSession::snapshot)
        .unwrap_or_else(|| ChatSession::new().snapshot());

    Json(snapshot)
}
