// src/api/http/handlers.rs

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::state::AppState;

/// Liveness plus which upstream providers are actually usable.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "openai_configured": state.chat_configured,
        "elevenlabs_configured": state.tts_configured,
    }))
}
