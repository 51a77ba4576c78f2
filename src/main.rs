// src/main.rs

use anyhow::Result;
use tracing::{info, Level};

use voicequest::api::build_router;
use voicequest::config::CONFIG;
use voicequest::db;
use voicequest::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let level = CONFIG.log_level.parse().unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    let pool = db::init(&CONFIG.database_url, CONFIG.sqlite_max_connections).await?;
    let state = AppState::from_config(&CONFIG, pool)?;
    let router = build_router(state, &CONFIG.cors_origin);

    let listener = tokio::net::TcpListener::bind(CONFIG.bind_address()).await?;
    info!("listening on {}", CONFIG.bind_address());

    if !CONFIG.chat_configured() {
        tracing::warn!("OPENAI_API_KEY not set; tutoring and assistant endpoints will fail");
    }
    if !CONFIG.tts_configured() {
        tracing::warn!("ELEVENLABS_API_KEY not set; the tts endpoint will fail");
    }

    axum::serve(listener, router).await?;
    Ok(())
}
