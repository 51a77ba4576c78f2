// src/canvas/store.rs
// Persisted tier of the LMS session cache.

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use super::types::CanvasCredentials;

#[derive(Clone)]
pub struct CanvasSessionStore {
    pub pool: SqlitePool,
}

impl CanvasSessionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn upsert(
        &self,
        session_id: &str,
        user_id: i64,
        creds: &CanvasCredentials,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO canvas_sessions
                (session_id, user_id, canvas_url, api_key, user_name, canvas_user_id)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .bind(&creds.canvas_url)
        .bind(&creds.api_key)
        .bind(&creds.user_name)
        .bind(creds.canvas_user_id)
        .execute(&self.pool)
        .await
        .context("Failed to persist canvas session")?;
        Ok(())
    }

    pub async fn get(&self, session_id: &str) -> Result<Option<CanvasCredentials>> {
        sqlx::query_as::<_, CanvasCredentials>(
            "SELECT canvas_url, api_key, user_name, canvas_user_id FROM canvas_sessions WHERE session_id = ?",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch canvas session")
    }

    pub async fn delete(&self, session_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM canvas_sessions WHERE session_id = ?")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete canvas session")?;
        Ok(())
    }
}
