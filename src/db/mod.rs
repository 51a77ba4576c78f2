// src/db/mod.rs

pub mod migration;
pub mod seed;

use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// Open the pool, run migrations and seed the catalogs if empty.
pub async fn init(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    migration::run_migrations(&pool).await?;
    seed::seed_if_empty(&pool).await?;

    Ok(pool)
}
