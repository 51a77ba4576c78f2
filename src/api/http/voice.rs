// src/api/http/voice.rs
// Spoken command interpretation and speech synthesis.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::api::error::{missing_param_error, ApiResult, IntoApiError};
use crate::assistant::QuestContext;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub current_page: Option<String>,
    #[serde(default)]
    pub available_quests: Vec<QuestContext>,
}

pub async fn command(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CommandRequest>,
) -> ApiResult<Json<Value>> {
    let transcript = req
        .transcript
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| missing_param_error("transcript"))?;
    let current_page = req.current_page.as_deref().unwrap_or("/");

    let reply = state
        .assistant
        .voice_command(transcript, current_page, &req.available_quests)
        .await
        .into_upstream_error("Voice command error")?;

    Ok(Json(reply))
}

#[derive(Debug, Deserialize)]
pub struct TtsRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub voice_id: Option<String>,
}

/// Synthesize speech and hand the audio straight through.
pub async fn tts(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TtsRequest>,
) -> ApiResult<Response> {
    let text = req
        .text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| missing_param_error("text"))?;
    let voice_id = req
        .voice_id
        .as_deref()
        .unwrap_or_else(|| state.speech.default_voice())
        .to_string();

    let audio = state
        .speech
        .synthesize(text, &voice_id)
        .await
        .into_upstream_error("TTS error")?;

    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], audio).into_response())
}
