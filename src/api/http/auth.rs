// src/api/http/auth.rs
// Name-only identification: no passwords, no tokens. Usernames are
// case-insensitive (stored lowercased).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::api::error::{missing_param_error, ApiResult, IntoApiError, IntoApiErrorOption};
use crate::api::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
}

fn normalized_username(raw: Option<&str>) -> Option<String> {
    let name = raw?.trim().to_lowercase();
    (!name.is_empty()).then_some(name)
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let username = normalized_username(req.username.as_deref())
        .ok_or_else(|| missing_param_error("username"))?;
    let display_name = req
        .display_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| missing_param_error("display_name"))?
        .to_string();

    let today = Utc::now().date_naive();
    let user = state
        .users
        .create(&username, &display_name, today)
        .await
        .into_api_error("Failed to create user")?
        .ok_or_else(|| ApiError::conflict("Username already taken"))?;

    info!(user_id = user.id, %username, "user registered");
    Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<Value>> {
    let username = normalized_username(req.username.as_deref())
        .ok_or_else(|| missing_param_error("username"))?;

    let user = state
        .users
        .get_by_username(&username)
        .await
        .into_api_error("Failed to look up user")?
        .ok_or_not_found("User not found")?;

    Ok(Json(json!({ "user": user })))
}
