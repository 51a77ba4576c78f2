// tests/canvas_cache.rs
// Two-tier LMS session cache: memory first, persisted rows as fallback.

mod common;

use std::sync::Arc;

use chrono::Utc;
use sqlx::SqlitePool;

use common::test_pool;
use voicequest::cache::InMemorySessionCache;
use voicequest::canvas::{CanvasCredentials, CanvasSessionStore, SessionTiers};
use voicequest::users::UserStore;

async fn seed_user(pool: &SqlitePool) -> i64 {
    UserStore::new(pool.clone())
        .create("ada", "Ada", Utc::now().date_naive())
        .await
        .expect("create user")
        .expect("unique username")
        .id
}

fn creds(url: &str) -> CanvasCredentials {
    CanvasCredentials {
        canvas_url: url.to_string(),
        api_key: "token-123".to_string(),
        user_name: Some("Ada Lovelace".to_string()),
        canvas_user_id: Some(42),
    }
}

#[tokio::test]
async fn memory_tier_resolves_without_touching_the_store() {
    let pool = test_pool().await;
    let tiers = SessionTiers::new(
        Arc::new(InMemorySessionCache::new(16)),
        CanvasSessionStore::new(pool.clone()),
    );

    // No user id: memory only, nothing persisted.
    tiers
        .insert("canvas_abc", None, creds("https://school.instructure.com"))
        .await
        .expect("insert");

    let resolved = tiers.resolve("canvas_abc").await.expect("resolve");
    assert_eq!(
        resolved.expect("hit").canvas_url,
        "https://school.instructure.com"
    );

    let store = CanvasSessionStore::new(pool);
    assert!(store.get("canvas_abc").await.expect("store get").is_none());
}

#[tokio::test]
async fn store_fallback_survives_memory_loss() {
    let pool = test_pool().await;
    let tiers = SessionTiers::new(
        Arc::new(InMemorySessionCache::new(16)),
        CanvasSessionStore::new(pool.clone()),
    );

    let user_id = seed_user(&pool).await;
    tiers
        .insert("canvas_def", Some(user_id), creds("https://school.instructure.com"))
        .await
        .expect("insert");

    // Fresh memory tier simulates a process restart; the persisted row
    // still resolves and repopulates memory.
    let memory = Arc::new(InMemorySessionCache::new(16));
    let rebuilt = SessionTiers::new(memory.clone(), CanvasSessionStore::new(pool));

    let resolved = rebuilt.resolve("canvas_def").await.expect("resolve");
    let resolved = resolved.expect("store fallback hit");
    assert_eq!(resolved.user_name.as_deref(), Some("Ada Lovelace"));
    assert_eq!(resolved.canvas_user_id, Some(42));

    use voicequest::cache::SessionCache;
    assert!(memory.get("canvas_def").await.is_some());
}

#[tokio::test]
async fn remove_drops_both_tiers() {
    let pool = test_pool().await;
    let tiers = SessionTiers::new(
        Arc::new(InMemorySessionCache::new(16)),
        CanvasSessionStore::new(pool.clone()),
    );

    let user_id = seed_user(&pool).await;
    tiers
        .insert("canvas_xyz", Some(user_id), creds("https://school.instructure.com"))
        .await
        .expect("insert");
    tiers.remove("canvas_xyz").await.expect("remove");

    assert!(tiers.resolve("canvas_xyz").await.expect("resolve").is_none());
    let store = CanvasSessionStore::new(pool);
    assert!(store.get("canvas_xyz").await.expect("store get").is_none());
}

#[tokio::test]
async fn unknown_session_resolves_to_none() {
    let pool = test_pool().await;
    let tiers = SessionTiers::new(
        Arc::new(InMemorySessionCache::new(16)),
        CanvasSessionStore::new(pool),
    );
    assert!(tiers.resolve("canvas_missing").await.expect("resolve").is_none());
}
