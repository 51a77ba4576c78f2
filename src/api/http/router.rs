// src/api/http/router.rs
// Route table: everything nests under /api with CORS and request tracing.

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::{assistant, auth, canvas, handlers, quests, users, voice};
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>, cors_origin: &str) -> Router {
    let cors = if cors_origin == "*" {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        match cors_origin.parse::<HeaderValue>() {
            Ok(origin) => CorsLayer::new()
                .allow_origin(origin)
                .allow_methods(Any)
                .allow_headers(Any),
            Err(_) => CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        }
    };

    let api = Router::new()
        .route("/health", get(handlers::health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/user/{user_id}/profile", get(users::profile))
        .route("/user/{user_id}/stats", get(users::stats))
        .route("/user/{user_id}/achievements", get(users::achievements))
        .route("/quests", get(quests::list))
        .route("/quests/custom", post(quests::create_custom))
        .route("/quests/{quest_id}/start", post(quests::start))
        .route("/quests/session/{session_id}/respond", post(quests::respond))
        .route("/assistant/chat", post(assistant::chat))
        .route("/assistant/reset", post(assistant::reset))
        .route("/voice/command", post(voice::command))
        .route("/tts", post(voice::tts))
        .route("/canvas/connect", post(canvas::connect))
        .route("/canvas/courses", get(canvas::courses))
        .route("/canvas/assignments", get(canvas::assignments))
        .route("/canvas/disconnect", post(canvas::disconnect))
        .route("/canvas/session/{session_id}", get(canvas::session))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
