// src/achievements/store.rs
// Static achievement catalog plus the idempotent unlock evaluator.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use tracing::info;

use crate::users::User;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Achievement {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: String,
    pub requirement_type: String,
    pub requirement_value: i64,
}

/// Catalog entry joined with the user's unlock state.
#[derive(Debug, Clone, Serialize)]
pub struct AchievementView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: String,
    pub unlocked: bool,
    pub unlocked_at: Option<NaiveDateTime>,
}

/// Minimal payload for "you just unlocked X" notifications.
#[derive(Debug, Clone, Serialize)]
pub struct UnlockedAchievement {
    pub name: String,
    pub icon: String,
}

impl Achievement {
    /// Whether this achievement's requirement holds for the given user.
    /// Unknown requirement types never match.
    fn requirement_met(&self, user: &User) -> bool {
        let stat = match self.requirement_type.as_str() {
            "quests_completed" => user.quests_completed,
            "xp" => user.xp,
            "streak" => user.streak,
            "level" => user.level,
            _ => return false,
        };
        stat >= self.requirement_value
    }
}

#[derive(Clone)]
pub struct AchievementStore {
    pub pool: SqlitePool,
}

impl AchievementStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Scan the catalog and unlock any achievement whose requirement newly
    /// holds for this user. Safe to call redundantly: the UNIQUE
    /// (user_id, achievement_id) constraint plus ON CONFLICT DO NOTHING means
    /// an achievement is only ever reported once.
    pub async fn evaluate(&self, user: &User) -> Result<Vec<UnlockedAchievement>> {
        let catalog = sqlx::query_as::<_, Achievement>("SELECT * FROM achievements")
            .fetch_all(&self.pool)
            .await
            .context("Failed to load achievement catalog")?;

        let mut newly_unlocked = Vec::new();

        for achievement in catalog {
            if !achievement.requirement_met(user) {
                continue;
            }

            let inserted = sqlx::query(
                r#"
                INSERT INTO user_achievements (user_id, achievement_id)
                VALUES (?, ?)
                ON CONFLICT(user_id, achievement_id) DO NOTHING
                "#,
            )
            .bind(user.id)
            .bind(achievement.id)
            .execute(&self.pool)
            .await
            .context("Failed to record achievement unlock")?;

            if inserted.rows_affected() > 0 {
                info!(user_id = user.id, achievement = %achievement.name, "achievement unlocked");
                newly_unlocked.push(UnlockedAchievement {
                    name: achievement.name,
                    icon: achievement.icon,
                });
            }
        }

        Ok(newly_unlocked)
    }

    /// Full catalog with this user's unlock state, ordered the way the
    /// profile page displays it.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<AchievementView>> {
        let rows = sqlx::query_as::<_, (i64, String, String, String, String, Option<NaiveDateTime>)>(
            r#"
            SELECT a.id, a.name, a.description, a.icon, a.category, ua.unlocked_at
            FROM achievements a
            LEFT JOIN user_achievements ua
                ON a.id = ua.achievement_id AND ua.user_id = ?
            ORDER BY a.category, a.requirement_value
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list achievements")?;

        Ok(rows
            .into_iter()
            .map(|(id, name, description, icon, category, unlocked_at)| AchievementView {
                id,
                name,
                description,
                icon,
                category,
                unlocked: unlocked_at.is_some(),
                unlocked_at,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user_with(xp: i64, level: i64, streak: i64, quests: i64) -> User {
        User {
            id: 1,
            username: "ada".to_string(),
            display_name: "Ada Lovelace".to_string(),
            xp,
            level,
            streak,
            longest_streak: streak,
            quests_completed: quests,
            last_active: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    fn achievement(req_type: &str, value: i64) -> Achievement {
        Achievement {
            id: 1,
            name: "Test".to_string(),
            description: String::new(),
            icon: "⭐".to_string(),
            category: "test".to_string(),
            requirement_type: req_type.to_string(),
            requirement_value: value,
        }
    }

    #[test]
    fn test_requirement_predicates() {
        let user = user_with(150, 2, 3, 1);

        assert!(achievement("xp", 100).requirement_met(&user));
        assert!(!achievement("xp", 200).requirement_met(&user));
        assert!(achievement("streak", 3).requirement_met(&user));
        assert!(achievement("level", 2).requirement_met(&user));
        assert!(achievement("quests_completed", 1).requirement_met(&user));
        assert!(!achievement("quests_completed", 2).requirement_met(&user));
    }

    #[test]
    fn test_unknown_requirement_never_matches() {
        let user = user_with(10_000, 99, 99, 99);
        assert!(!achievement("mystery_stat", 0).requirement_met(&user));
    }
}
