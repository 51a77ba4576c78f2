// src/api/http/quests.rs

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::error;

use crate::api::error::{missing_param_error, ApiError, ApiResult, IntoApiError, IntoApiErrorOption};
use crate::canvas::CanvasAssignment;
use crate::quests::{RespondError, RespondOutcome, SessionView};
use crate::state::AppState;

fn respond_error(e: RespondError) -> ApiError {
    match e {
        RespondError::SessionNotFound => ApiError::not_found("Session not found"),
        RespondError::SessionCompleted => ApiError::bad_request("Session already completed"),
        RespondError::QuestNotFound => ApiError::not_found("Quest not found"),
        RespondError::Provider(e) => {
            let message = format!("Tutor unavailable: {e}");
            error!("{message}");
            ApiError::internal(message)
        }
        RespondError::Storage(e) => {
            error!("quest session storage error: {e}");
            ApiError::internal("Storage error")
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub user_id: Option<i64>,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Value>> {
    let quests = state
        .quests
        .list(params.user_id)
        .await
        .into_api_error("Failed to list quests")?;
    Ok(Json(json!({ "quests": quests })))
}

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    #[serde(default)]
    pub user_id: Option<i64>,
}

pub async fn start(
    State(state): State<Arc<AppState>>,
    Path(quest_id): Path<i64>,
    Json(req): Json<StartRequest>,
) -> ApiResult<Json<SessionView>> {
    let user_id = req.user_id.ok_or_else(|| missing_param_error("user_id"))?;

    let user = state
        .users
        .get_by_id(user_id)
        .await
        .into_api_error("Failed to fetch user")?
        .ok_or_not_found("User not found")?;

    let quest = state
        .quests
        .get(quest_id)
        .await
        .into_api_error("Failed to fetch quest")?
        .ok_or_not_found("Quest not found")?;

    let session = state
        .engine
        .start(&user, &quest)
        .await
        .map_err(respond_error)?;

    Ok(Json(session))
}

#[derive(Debug, Deserialize)]
pub struct CustomQuestRequest {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub num_questions: Option<i64>,
    #[serde(default)]
    pub canvas_assignments: Vec<CanvasAssignment>,
}

pub async fn create_custom(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CustomQuestRequest>,
) -> ApiResult<Json<Value>> {
    let user_id = req.user_id.ok_or_else(|| missing_param_error("user_id"))?;
    let topic = req
        .topic
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| missing_param_error("topic"))?;
    let num_questions = req.num_questions.unwrap_or(5).clamp(1, 20);

    let user = state
        .users
        .get_by_id(user_id)
        .await
        .into_api_error("Failed to fetch user")?
        .ok_or_not_found("User not found")?;

    let generated = state
        .generator
        .create(&state.engine, &user, topic, num_questions, &req.canvas_assignments)
        .await
        .map_err(respond_error)?;

    Ok(Json(json!({
        "quest": generated.quest,
        "session": generated.session,
    })))
}

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    #[serde(default)]
    pub message: Option<String>,
}

pub async fn respond(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<RespondRequest>,
) -> ApiResult<Json<RespondOutcome>> {
    let message = req
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| missing_param_error("message"))?;

    let outcome = state
        .engine
        .respond(&session_id, message)
        .await
        .map_err(respond_error)?;

    Ok(Json(outcome))
}
