// src/users/types.rs

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use sqlx::FromRow;

/// A registered learner. `level` is always kept consistent with `xp` through
/// the leveling function whenever xp changes.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub xp: i64,
    pub level: i64,
    pub streak: i64,
    pub longest_streak: i64,
    pub quests_completed: i64,
    pub last_active: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
}

/// Per-topic rollup for the stats endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct TopicProgress {
    pub topic: String,
    pub quests_completed: i64,
    pub total_quests: i64,
    pub average_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserStats {
    pub xp: i64,
    pub level: i64,
    pub xp_to_next_level: i64,
    pub streak: i64,
    pub longest_streak: i64,
    pub quests_completed: i64,
    pub total_quests: i64,
    pub achievements_unlocked: i64,
    pub total_achievements: i64,
    pub weekly_xp: [i64; 7],
    pub topics_progress: Vec<TopicProgress>,
}
