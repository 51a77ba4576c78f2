// src/quests/types.rs

use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_COMPLETED: &str = "completed";

/// Full quest row. `system_prompt` and `num_questions` stay server-side;
/// clients only ever see [`QuestSummary`].
#[derive(Debug, Clone, FromRow)]
pub struct Quest {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub topic: String,
    pub difficulty: String,
    pub xp_reward: i64,
    pub estimated_minutes: i64,
    pub icon: String,
    pub system_prompt: String,
    pub num_questions: i64,
}

/// Client-safe quest projection, optionally joined with the caller's
/// progress record.
#[derive(Debug, Clone, Serialize)]
pub struct QuestSummary {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub topic: String,
    pub difficulty: String,
    pub xp_reward: i64,
    pub estimated_minutes: i64,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_score: Option<i64>,
}

impl From<&Quest> for QuestSummary {
    fn from(q: &Quest) -> Self {
        Self {
            id: q.id,
            title: q.title.clone(),
            description: q.description.clone(),
            topic: q.topic.clone(),
            difficulty: q.difficulty.clone(),
            xp_reward: q.xp_reward,
            estimated_minutes: q.estimated_minutes,
            icon: q.icon.clone(),
            is_completed: None,
            best_score: None,
        }
    }
}

/// One transcript turn. `role` is "tutor" or "user"; grading metadata only
/// appears on tutor turns that answered a student response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptTurn {
    pub role: String,
    pub content: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

impl TranscriptTurn {
    pub fn tutor(content: impl Into<String>) -> Self {
        Self {
            role: "tutor".to_string(),
            content: content.into(),
            timestamp: Utc::now().naive_utc().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            is_correct: None,
            feedback: None,
        }
    }

    pub fn student(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
            timestamp: Utc::now().naive_utc().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            is_correct: None,
            feedback: None,
        }
    }
}

/// Quest session row. The transcript is stored as a JSON array in the
/// `messages` text column.
#[derive(Debug, Clone, FromRow)]
pub struct QuestSession {
    pub session_id: String,
    pub user_id: i64,
    pub quest_id: i64,
    pub messages: String,
    pub current_question: i64,
    pub total_questions: i64,
    pub score: i64,
    pub status: String,
    pub started_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
}

impl QuestSession {
    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }

    pub fn transcript(&self) -> Result<Vec<TranscriptTurn>> {
        serde_json::from_str(&self.messages).context("Corrupt session transcript")
    }
}

/// Session payload as clients see it: question index presented 1-based.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub quest_id: i64,
    pub messages: Vec<TranscriptTurn>,
    pub current_question: i64,
    pub total_questions: i64,
    pub score: i64,
    pub status: String,
}
