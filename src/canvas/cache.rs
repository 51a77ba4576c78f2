// src/canvas/cache.rs
// Two-tier session lookup: in-memory map first, then the persisted rows. A
// fallback hit repopulates the memory tier so the next lookup is cheap.

use anyhow::Result;
use std::sync::Arc;

use super::store::CanvasSessionStore;
use super::types::CanvasCredentials;
use crate::cache::SessionCache;

pub struct SessionTiers {
    memory: Arc<dyn SessionCache<CanvasCredentials>>,
    store: CanvasSessionStore,
}

impl SessionTiers {
    pub fn new(memory: Arc<dyn SessionCache<CanvasCredentials>>, store: CanvasSessionStore) -> Self {
        Self { memory, store }
    }

    pub async fn resolve(&self, session_id: &str) -> Result<Option<CanvasCredentials>> {
        if let Some(creds) = self.memory.get(session_id).await {
            return Ok(Some(creds));
        }

        match self.store.get(session_id).await? {
            Some(creds) => {
                self.memory.put(session_id, creds.clone()).await;
                Ok(Some(creds))
            }
            None => Ok(None),
        }
    }

    /// Cache a fresh connection; persists only when a local user is known.
    pub async fn insert(
        &self,
        session_id: &str,
        user_id: Option<i64>,
        creds: CanvasCredentials,
    ) -> Result<()> {
        self.memory.put(session_id, creds.clone()).await;
        if let Some(user_id) = user_id {
            self.store.upsert(session_id, user_id, &creds).await?;
        }
        Ok(())
    }

    /// Drop both tiers.
    pub async fn remove(&self, session_id: &str) -> Result<()> {
        self.memory.remove(session_id).await;
        self.store.delete(session_id).await
    }
}
