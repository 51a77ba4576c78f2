// src/api/http/users.rs

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::error::{ApiResult, IntoApiError, IntoApiErrorOption};
use crate::state::AppState;

pub async fn profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let user = state
        .users
        .get_by_id(user_id)
        .await
        .into_api_error("Failed to fetch user")?
        .ok_or_not_found("User not found")?;
    Ok(Json(json!({ "user": user })))
}

pub async fn stats(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let stats = state
        .users
        .stats(user_id)
        .await
        .into_api_error("Failed to compute user stats")?
        .ok_or_not_found("User not found")?;
    Ok(Json(json!({ "stats": stats })))
}

pub async fn achievements(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Value>> {
    state
        .users
        .get_by_id(user_id)
        .await
        .into_api_error("Failed to fetch user")?
        .ok_or_not_found("User not found")?;

    let achievements = state
        .achievements
        .list_for_user(user_id)
        .await
        .into_api_error("Failed to list achievements")?;

    Ok(Json(json!({ "achievements": achievements })))
}
