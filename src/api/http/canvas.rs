// src/api/http/canvas.rs
// LMS bridge endpoints. Sessions are keyed by an opaque `canvas_...` id
// minted at connect time; lookups go through the two-tier cache.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::api::error::{missing_param_error, ApiError, ApiResult, IntoApiError};
use crate::canvas::{CanvasCredentials, CanvasError};
use crate::state::AppState;

fn canvas_error(e: CanvasError) -> ApiError {
    match e {
        CanvasError::InvalidCredentials => ApiError::unauthorized(e.to_string()),
        CanvasError::Unreachable(_) => ApiError::bad_request(e.to_string()),
        CanvasError::Upstream(message) => ApiError::internal(message),
    }
}

async fn resolve_session(
    state: &AppState,
    session_id: &str,
) -> ApiResult<CanvasCredentials> {
    state
        .canvas_sessions
        .resolve(session_id)
        .await
        .into_api_error("Failed to resolve Canvas session")?
        .ok_or_else(|| ApiError::unauthorized("Canvas not connected"))
}

#[derive(Debug, Deserialize)]
pub struct ConnectRequest {
    #[serde(default)]
    pub canvas_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// Session ids are always minted server-side; clients never pick their own
/// cache keys.
fn mint_session_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("canvas_{}", &hex[..12])
}

pub async fn connect(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ConnectRequest>,
) -> ApiResult<Json<Value>> {
    let canvas_url = req
        .canvas_url
        .as_deref()
        .map(|u| u.trim().trim_end_matches('/'))
        .filter(|u| !u.is_empty())
        .ok_or_else(|| missing_param_error("canvas_url"))?;
    let api_key = req
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| missing_param_error("api_key"))?;

    let profile = state
        .canvas
        .fetch_profile(canvas_url, api_key)
        .await
        .map_err(canvas_error)?;

    let session_id = mint_session_id();

    let creds = CanvasCredentials {
        canvas_url: canvas_url.to_string(),
        api_key: api_key.to_string(),
        user_name: profile.name.clone(),
        canvas_user_id: profile.id,
    };

    state
        .canvas_sessions
        .insert(&session_id, req.user_id, creds)
        .await
        .into_api_error("Failed to store Canvas session")?;

    info!(%session_id, "canvas connected");

    Ok(Json(json!({
        "success": true,
        "session_id": session_id,
        "user_name": profile.name,
        "avatar_url": profile.avatar_url,
    })))
}

#[derive(Debug, Deserialize)]
pub struct SessionParams {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub course_id: Option<i64>,
}

pub async fn courses(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SessionParams>,
) -> ApiResult<Json<Value>> {
    let session_id = params
        .session_id
        .as_deref()
        .ok_or_else(|| missing_param_error("session_id"))?;
    let creds = resolve_session(&state, session_id).await?;

    let courses = state
        .canvas
        .fetch_courses(&creds)
        .await
        .map_err(canvas_error)?;

    Ok(Json(json!({ "courses": courses })))
}

pub async fn assignments(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SessionParams>,
) -> ApiResult<Json<Value>> {
    let session_id = params
        .session_id
        .as_deref()
        .ok_or_else(|| missing_param_error("session_id"))?;
    let creds = resolve_session(&state, session_id).await?;

    let assignments = match params.course_id {
        Some(course_id) => state
            .canvas
            .fetch_course_assignments(&creds, course_id, 20)
            .await
            .map_err(canvas_error)?,
        None => state
            .canvas
            .fetch_all_assignments(&creds)
            .await
            .map_err(canvas_error)?,
    };

    Ok(Json(json!({ "assignments": assignments })))
}

#[derive(Debug, Deserialize)]
pub struct DisconnectRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

pub async fn disconnect(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DisconnectRequest>,
) -> ApiResult<Json<Value>> {
    let session_id = req
        .session_id
        .as_deref()
        .ok_or_else(|| missing_param_error("session_id"))?;

    state
        .canvas_sessions
        .remove(session_id)
        .await
        .into_api_error("Failed to disconnect Canvas session")?;

    Ok(Json(json!({ "status": "ok" })))
}

/// Session existence probe for page reloads; the api_key never leaves the
/// server.
pub async fn session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<Response> {
    let resolved = state
        .canvas_sessions
        .resolve(&session_id)
        .await
        .into_api_error("Failed to resolve Canvas session")?;

    Ok(match resolved {
        Some(creds) => Json(json!({
            "exists": true,
            "user_name": creds.user_name,
            "canvas_url": creds.canvas_url,
        }))
        .into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "exists": false }))).into_response(),
    })
}
