// src/quests/store.rs

use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Utc};
use sqlx::SqlitePool;

use super::types::{Quest, QuestSession, QuestSummary};

#[derive(Clone)]
pub struct QuestStore {
    pub pool: SqlitePool,
}

impl QuestStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, quest_id: i64) -> Result<Option<Quest>> {
        sqlx::query_as::<_, Quest>("SELECT * FROM quests WHERE id = ?")
            .bind(quest_id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch quest")
    }

    /// Client-safe quest list; joins the caller's progress when a user id is
    /// given. Never selects system_prompt or num_questions.
    pub async fn list(&self, user_id: Option<i64>) -> Result<Vec<QuestSummary>> {
        let rows: Vec<(i64, String, String, String, String, i64, i64, String, Option<bool>, Option<i64>)> =
            match user_id {
                Some(user_id) => sqlx::query_as(
                    r#"
                    SELECT q.id, q.title, q.description, q.topic, q.difficulty,
                           q.xp_reward, q.estimated_minutes, q.icon,
                           uqp.completed as is_completed, uqp.best_score
                    FROM quests q
                    LEFT JOIN user_quest_progress uqp
                        ON q.id = uqp.quest_id AND uqp.user_id = ?
                    ORDER BY q.difficulty, q.topic
                    "#,
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
                .context("Failed to list quests with progress")?,
                None => sqlx::query_as(
                    r#"
                    SELECT id, title, description, topic, difficulty,
                           xp_reward, estimated_minutes, icon,
                           NULL as is_completed, NULL as best_score
                    FROM quests
                    ORDER BY difficulty, topic
                    "#,
                )
                .fetch_all(&self.pool)
                .await
                .context("Failed to list quests")?,
            };

        Ok(rows
            .into_iter()
            .map(
                |(id, title, description, topic, difficulty, xp_reward, estimated_minutes, icon, is_completed, best_score)| {
                    QuestSummary {
                        id,
                        title,
                        description,
                        topic,
                        difficulty,
                        xp_reward,
                        estimated_minutes,
                        icon,
                        is_completed: if user_id.is_some() {
                            Some(is_completed.unwrap_or(false))
                        } else {
                            None
                        },
                        best_score: if user_id.is_some() { Some(best_score.unwrap_or(0)) } else { None },
                    }
                },
            )
            .collect())
    }

    /// Persist a generated custom quest and return its row.
    #[allow(clippy::too_many_arguments)]
    pub async fn insert(
        &self,
        title: &str,
        description: &str,
        topic: &str,
        difficulty: &str,
        xp_reward: i64,
        estimated_minutes: i64,
        icon: &str,
        system_prompt: &str,
        num_questions: i64,
    ) -> Result<Quest> {
        let result = sqlx::query(
            r#"
            INSERT INTO quests
                (title, description, topic, difficulty, xp_reward, estimated_minutes, icon, system_prompt, num_questions)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(topic)
        .bind(difficulty)
        .bind(xp_reward)
        .bind(estimated_minutes)
        .bind(icon)
        .bind(system_prompt)
        .bind(num_questions)
        .execute(&self.pool)
        .await
        .context("Failed to insert quest")?;

        self.get(result.last_insert_rowid())
            .await?
            .context("Quest vanished after insert")
    }

    /// Record an attempt: bump the counter on the existing progress row or
    /// create one.
    pub async fn record_attempt(&self, user_id: i64, quest_id: i64) -> Result<()> {
        let now = Utc::now().naive_utc();
        sqlx::query(
            r#"
            INSERT INTO user_quest_progress (user_id, quest_id, attempts, last_attempt)
            VALUES (?, ?, 1, ?)
            ON CONFLICT(user_id, quest_id)
            DO UPDATE SET attempts = attempts + 1, last_attempt = excluded.last_attempt
            "#,
        )
        .bind(user_id)
        .bind(quest_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to record quest attempt")?;
        Ok(())
    }

    /// Mark the quest completed; best_score is a running maximum.
    pub async fn record_completion(&self, user_id: i64, quest_id: i64, score: i64) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE user_quest_progress
            SET completed = 1, best_score = MAX(best_score, ?)
            WHERE user_id = ? AND quest_id = ?
            "#,
        )
        .bind(score)
        .bind(user_id)
        .bind(quest_id)
        .execute(&self.pool)
        .await
        .context("Failed to record quest completion")?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct SessionStore {
    pub pool: SqlitePool,
}

impl SessionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        session_id: &str,
        user_id: i64,
        quest_id: i64,
        messages_json: &str,
        total_questions: i64,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO quest_sessions (session_id, user_id, quest_id, messages, total_questions, status)
            VALUES (?, ?, ?, ?, ?, 'active')
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .bind(quest_id)
        .bind(messages_json)
        .bind(total_questions)
        .execute(&self.pool)
        .await
        .context("Failed to insert quest session")?;
        Ok(())
    }

    pub async fn get(&self, session_id: &str) -> Result<Option<QuestSession>> {
        sqlx::query_as::<_, QuestSession>("SELECT * FROM quest_sessions WHERE session_id = ?")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch quest session")
    }

    pub async fn update_progress(
        &self,
        session_id: &str,
        messages_json: &str,
        current_question: i64,
        score: i64,
        status: &str,
        completed_at: Option<NaiveDateTime>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE quest_sessions
            SET messages = ?, current_question = ?, score = ?, status = ?,
                completed_at = COALESCE(?, completed_at)
            WHERE session_id = ?
            "#,
        )
        .bind(messages_json)
        .bind(current_question)
        .bind(score)
        .bind(status)
        .bind(completed_at)
        .bind(session_id)
        .execute(&self.pool)
        .await
        .context("Failed to update quest session")?;
        Ok(())
    }
}
