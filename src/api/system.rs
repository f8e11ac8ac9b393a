//! System routes: config introspection and the voice stub
//!
//! `/api/config` deliberately never emits the API key. All upstream calls
//! are proxied server-side; the browser only learns the model name and
//! whether a key is present.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

#[allow(missing_docs)]
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub model: String,
    pub key_configured: bool,
    pub persona_loaded: bool,
}

#[allow(missing_docs)]
#[derive(Serialize)]
pub struct VoiceResponse {
    pub message: String,
    pub status: String,
}

/// Report non-secret upstream configuration
///
/// Returns 500 with an explanatory message while the key is unset, so the
/// UI can show a setup hint.
pub async fn get_config(State(state): State<AppState>) -> Result<Json<ConfigResponse>, AppError> {
    if !state.key_configured() {
        return Err(AppError::ApiKeyMissing);
    }
    Ok(Json(ConfigResponse {
        model: state.model.clone(),
        key_configured: true,
        persona_loaded: !state.persona.is_empty(),
    }))
}

/// Voice input stub; the feature is not built yet
pub async fn voice() -> Json<VoiceResponse> {
    Json(VoiceResponse {
        message: "Voice input is not available yet".to_string(),
        status: "development".to_string(),
    })
}
