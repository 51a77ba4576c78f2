// tests/common/mod.rs
// Shared harness: in-memory SQLite, scripted providers, and a router
// driven through tower's oneshot.
#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;

use voicequest::api::build_router;
use voicequest::canvas::CanvasClient;
use voicequest::config::Config;
use voicequest::db;
use voicequest::llm::{ChatMessage, ChatProvider};
use voicequest::state::AppState;
use voicequest::tts::SpeechProvider;

/// Chat provider that replays a fixed script. Once the script runs out it
/// keeps returning the fallback line.
pub struct ScriptedChat {
    replies: Mutex<VecDeque<String>>,
    fallback: String,
}

impl ScriptedChat {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            fallback: "Okay!".to_string(),
        }
    }
}

#[async_trait]
impl ChatProvider for ScriptedChat {
    async fn complete(
        &self,
        _messages: &[ChatMessage],
        _max_tokens: u32,
        _temperature: f32,
    ) -> Result<String> {
        let mut replies = self.replies.lock().await;
        Ok(replies.pop_front().unwrap_or_else(|| self.fallback.clone()))
    }
}

pub struct FakeSpeech;

#[async_trait]
impl SpeechProvider for FakeSpeech {
    async fn synthesize(&self, _text: &str, _voice_id: &str) -> Result<Vec<u8>> {
        Ok(b"ID3fake-mpeg-audio".to_vec())
    }

    fn default_voice(&self) -> &str {
        "test-voice"
    }
}

/// Migrated and seeded in-memory database. A single connection is required:
/// every `sqlite::memory:` connection is its own database.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    db::migration::run_migrations(&pool)
        .await
        .expect("migrations");
    db::seed::seed_if_empty(&pool).await.expect("seed");
    pool
}

pub async fn test_state(replies: &[&str]) -> (Arc<AppState>, SqlitePool) {
    let pool = test_pool().await;
    let config = Config::from_env();
    let state = AppState::assemble(
        pool.clone(),
        Arc::new(ScriptedChat::new(replies)),
        Arc::new(FakeSpeech),
        CanvasClient::from_config(&config).expect("canvas client"),
        config.assistant_history_cap,
        config.assistant_session_cap,
        true,
        true,
    );
    (state, pool)
}

pub async fn test_router(replies: &[&str]) -> (Router, SqlitePool) {
    let (state, pool) = test_state(replies).await;
    (build_router(state, "*"), pool)
}

/// Send one JSON request through the router and decode the JSON response.
pub async fn request_json(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("request"),
    };

    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// A grading reply awarding the given score, in the documented verdict
/// format.
pub fn grading_reply(is_correct: bool, score_delta: i64, feedback: &str) -> String {
    format!(
        "{{\"is_correct\": {is_correct}, \"score_delta\": {score_delta}}}\n{feedback}"
    )
}
