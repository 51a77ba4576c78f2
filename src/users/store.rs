// src/users/store.rs

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, Utc};
use sqlx::SqlitePool;

use super::leveling::{level_for_xp, xp_to_next_level, LevelProgress};
use super::types::{TopicProgress, User, UserStats};

#[derive(Clone)]
pub struct UserStore {
    pub pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new user active today. Returns `None` when the username is
    /// already taken (unique constraint), which the handler maps to a 409.
    pub async fn create(
        &self,
        username: &str,
        display_name: &str,
        today: NaiveDate,
    ) -> Result<Option<User>> {
        let result = sqlx::query(
            "INSERT INTO users (username, display_name, last_active) VALUES (?, ?, ?)",
        )
        .bind(username)
        .bind(display_name)
        .bind(today)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                let user = self
                    .get_by_username(username)
                    .await?
                    .context("User vanished after insert")?;
                Ok(Some(user))
            }
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Ok(None),
            Err(e) => Err(e).context("Failed to create user"),
        }
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user by username")
    }

    pub async fn get_by_id(&self, user_id: i64) -> Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user by id")
    }

    /// Daily streak update: unchanged if already active today, incremented if
    /// last active exactly yesterday, otherwise reset to 1. Longest streak is
    /// the running maximum. `today` is injected so tests control the clock.
    pub async fn update_streak(&self, user_id: i64, today: NaiveDate) -> Result<()> {
        let user = self
            .get_by_id(user_id)
            .await?
            .context("Cannot update streak for unknown user")?;

        if user.last_active == Some(today) {
            return Ok(());
        }

        let yesterday = today - Duration::days(1);
        let new_streak = if user.last_active == Some(yesterday) {
            user.streak + 1
        } else {
            1
        };
        let longest = user.longest_streak.max(new_streak);

        sqlx::query("UPDATE users SET streak = ?, longest_streak = ?, last_active = ? WHERE id = ?")
            .bind(new_streak)
            .bind(longest)
            .bind(today)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .context("Failed to update streak")?;

        Ok(())
    }

    /// Apply a completed quest: add the earned xp, recompute the level from
    /// the new total, and bump the completion counter.
    pub async fn award_quest_completion(&self, user_id: i64, xp_earned: i64) -> Result<User> {
        let user = self
            .get_by_id(user_id)
            .await?
            .context("Cannot award xp to unknown user")?;

        let new_xp = user.xp + xp_earned;
        let new_level = level_for_xp(new_xp);

        sqlx::query(
            "UPDATE users SET xp = ?, level = ?, quests_completed = quests_completed + 1 WHERE id = ?",
        )
        .bind(new_xp)
        .bind(new_level)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .context("Failed to apply quest completion")?;

        self.get_by_id(user_id)
            .await?
            .context("User vanished after completion update")
    }

    /// Full stats payload: leveling progress, catalog counts, weekly xp
    /// buckets from completed sessions, and per-topic progress.
    pub async fn stats(&self, user_id: i64) -> Result<Option<UserStats>> {
        let Some(user) = self.get_by_id(user_id).await? else {
            return Ok(None);
        };

        let total_quests: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quests")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count quests")?;

        let total_achievements: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM achievements")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count achievements")?;

        let achievements_unlocked: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM user_achievements WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .context("Failed to count unlocked achievements")?;

        let topics = sqlx::query_as::<_, (String, i64, i64, f64)>(
            r#"
            SELECT q.topic,
                   COUNT(CASE WHEN uqp.completed = 1 THEN 1 END) as completed,
                   COUNT(*) as total,
                   COALESCE(AVG(CASE WHEN uqp.best_score > 0 THEN uqp.best_score END), 0.0) as avg_score
            FROM quests q
            LEFT JOIN user_quest_progress uqp ON q.id = uqp.quest_id AND uqp.user_id = ?
            GROUP BY q.topic
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch topic progress")?;

        // Session scores from the last 7 days, bucketed by day (index 6 = today).
        let mut weekly_xp = [0i64; 7];
        let recent = sqlx::query_as::<_, (i64, chrono::NaiveDateTime)>(
            r#"
            SELECT score, completed_at
            FROM quest_sessions
            WHERE user_id = ? AND status = 'completed'
              AND completed_at >= datetime('now', '-7 days')
            ORDER BY completed_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch recent sessions")?;

        let now = Utc::now().naive_utc();
        for (score, completed_at) in recent {
            let days_ago = (now - completed_at).num_days();
            if (0..7).contains(&days_ago) {
                weekly_xp[(6 - days_ago) as usize] += score;
            }
        }

        let progress = LevelProgress::for_xp(user.xp);
        debug_assert_eq!(progress.xp_to_next(), xp_to_next_level(user.xp));

        Ok(Some(UserStats {
            xp: user.xp,
            level: user.level,
            xp_to_next_level: progress.xp_to_next(),
            streak: user.streak,
            longest_streak: user.longest_streak,
            quests_completed: user.quests_completed,
            total_quests,
            achievements_unlocked,
            total_achievements,
            weekly_xp,
            topics_progress: topics
                .into_iter()
                .map(|(topic, completed, total, avg_score)| TopicProgress {
                    topic,
                    quests_completed: completed,
                    total_quests: total,
                    average_score: (avg_score * 10.0).round() / 10.0,
                })
                .collect(),
        }))
    }
}
