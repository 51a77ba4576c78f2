// src/api/http/assistant.rs

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::error::{missing_param_error, ApiResult, IntoApiError};
use crate::assistant::AssistantContext;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub context: Option<AssistantContext>,
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> ApiResult<Json<Value>> {
    let message = req
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| missing_param_error("message"))?;
    let session_id = req.session_id.as_deref().unwrap_or("default");
    let context = req.context.unwrap_or_default();

    let reply = state
        .assistant
        .chat(session_id, message, &context)
        .await
        .into_upstream_error("Assistant error")?;

    Ok(Json(reply))
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

pub async fn reset(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResetRequest>,
) -> Json<Value> {
    let session_id = req.session_id.as_deref().unwrap_or("default");
    state.assistant.reset(session_id).await;
    Json(json!({ "success": true }))
}
