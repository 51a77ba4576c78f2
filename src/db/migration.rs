// src/db/migration.rs
//! Schema for all persisted state. Run at every startup (idempotent).

use anyhow::Result;
use sqlx::{Executor, SqlitePool};
use tracing::info;

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT UNIQUE NOT NULL,
    display_name TEXT NOT NULL,
    xp INTEGER NOT NULL DEFAULT 0,
    level INTEGER NOT NULL DEFAULT 1,
    streak INTEGER NOT NULL DEFAULT 0,
    longest_streak INTEGER NOT NULL DEFAULT 0,
    quests_completed INTEGER NOT NULL DEFAULT 0,
    last_active DATE,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#;

const CREATE_QUESTS: &str = r#"
CREATE TABLE IF NOT EXISTS quests (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    topic TEXT NOT NULL,
    difficulty TEXT NOT NULL DEFAULT 'beginner',
    xp_reward INTEGER NOT NULL DEFAULT 50,
    estimated_minutes INTEGER NOT NULL DEFAULT 5,
    icon TEXT NOT NULL DEFAULT '📚',
    system_prompt TEXT NOT NULL,
    num_questions INTEGER NOT NULL DEFAULT 5
);
"#;

const CREATE_QUEST_SESSIONS: &str = r#"
CREATE TABLE IF NOT EXISTS quest_sessions (
    session_id TEXT PRIMARY KEY,
    user_id INTEGER NOT NULL,
    quest_id INTEGER NOT NULL,
    messages TEXT NOT NULL DEFAULT '[]',
    current_question INTEGER NOT NULL DEFAULT 0,
    total_questions INTEGER NOT NULL DEFAULT 5,
    score INTEGER NOT NULL DEFAULT 0,
    status TEXT NOT NULL DEFAULT 'active',
    started_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    completed_at TIMESTAMP,
    FOREIGN KEY (user_id) REFERENCES users(id),
    FOREIGN KEY (quest_id) REFERENCES quests(id)
);
"#;

const CREATE_USER_QUEST_PROGRESS: &str = r#"
CREATE TABLE IF NOT EXISTS user_quest_progress (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    quest_id INTEGER NOT NULL,
    completed BOOLEAN NOT NULL DEFAULT 0,
    best_score INTEGER NOT NULL DEFAULT 0,
    attempts INTEGER NOT NULL DEFAULT 0,
    last_attempt TIMESTAMP,
    FOREIGN KEY (user_id) REFERENCES users(id),
    FOREIGN KEY (quest_id) REFERENCES quests(id),
    UNIQUE(user_id, quest_id)
);
"#;

const CREATE_ACHIEVEMENTS: &str = r#"
CREATE TABLE IF NOT EXISTS achievements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    icon TEXT NOT NULL,
    category TEXT NOT NULL,
    requirement_type TEXT NOT NULL,
    requirement_value INTEGER NOT NULL
);
"#;

// The UNIQUE pair is what makes achievement unlocks idempotent; the
// evaluator relies on it.
const CREATE_USER_ACHIEVEMENTS: &str = r#"
CREATE TABLE IF NOT EXISTS user_achievements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    achievement_id INTEGER NOT NULL,
    unlocked_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (user_id) REFERENCES users(id),
    FOREIGN KEY (achievement_id) REFERENCES achievements(id),
    UNIQUE(user_id, achievement_id)
);
"#;

const CREATE_CANVAS_SESSIONS: &str = r#"
CREATE TABLE IF NOT EXISTS canvas_sessions (
    session_id TEXT PRIMARY KEY,
    user_id INTEGER NOT NULL,
    canvas_url TEXT NOT NULL,
    api_key TEXT NOT NULL,
    user_name TEXT,
    canvas_user_id INTEGER,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (user_id) REFERENCES users(id)
);
"#;

const CREATE_INDICES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_quest_sessions_user ON quest_sessions(user_id);
CREATE INDEX IF NOT EXISTS idx_progress_user ON user_quest_progress(user_id);
CREATE INDEX IF NOT EXISTS idx_user_achievements_user ON user_achievements(user_id);
"#;

/// Runs all required migrations. Safe to call at every startup.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    pool.execute(CREATE_USERS).await?;
    pool.execute(CREATE_QUESTS).await?;
    pool.execute(CREATE_QUEST_SESSIONS).await?;
    pool.execute(CREATE_USER_QUEST_PROGRESS).await?;
    pool.execute(CREATE_ACHIEVEMENTS).await?;
    pool.execute(CREATE_USER_ACHIEVEMENTS).await?;
    pool.execute(CREATE_CANVAS_SESSIONS).await?;
    pool.execute(CREATE_INDICES).await?;

    info!("database schema ready");
    Ok(())
}
