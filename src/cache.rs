// src/cache.rs
// Ephemeral keyed state (assistant history, LMS credential cache) lives
// behind this trait so its volatility is an injected choice rather than an
// accident of the process. The in-memory impl is bounded: when the session
// count passes the capacity, the least recently touched entry is evicted.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Instant;
use tokio::sync::Mutex;

#[async_trait]
pub trait SessionCache<T>: Send + Sync
where
    T: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Option<T>;
    async fn put(&self, key: &str, value: T);
    async fn remove(&self, key: &str);
}

struct Entry<T> {
    value: T,
    touched: Instant,
}

pub struct InMemorySessionCache<T> {
    entries: Mutex<HashMap<String, Entry<T>>>,
    capacity: usize,
}

impl<T> InMemorySessionCache<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }
}

#[async_trait]
impl<T> SessionCache<T> for InMemorySessionCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Option<T> {
        let mut entries = self.entries.lock().await;
        let entry = entries.get_mut(key)?;
        entry.touched = Instant::now();
        Some(entry.value.clone())
    }

    async fn put(&self, key: &str, value: T) {
        let mut entries = self.entries.lock().await;

        if !entries.contains_key(key) && entries.len() >= self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.touched)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
            }
        }

        entries.insert(
            key.to_string(),
            Entry { value, touched: Instant::now() },
        );
    }

    async fn remove(&self, key: &str) {
        self.entries.lock().await.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_put_remove() {
        let cache: InMemorySessionCache<i32> = InMemorySessionCache::new(4);
        assert_eq!(cache.get("a").await, None);

        cache.put("a", 1).await;
        assert_eq!(cache.get("a").await, Some(1));

        cache.put("a", 2).await;
        assert_eq!(cache.get("a").await, Some(2));

        cache.remove("a").await;
        assert_eq!(cache.get("a").await, None);
    }

    #[tokio::test]
    async fn test_capacity_evicts_least_recently_touched() {
        let cache: InMemorySessionCache<i32> = InMemorySessionCache::new(2);
        cache.put("a", 1).await;
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        cache.put("b", 2).await;
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;

        // Touch "a" so "b" is the eviction candidate.
        cache.get("a").await;
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;

        cache.put("c", 3).await;
        assert_eq!(cache.get("a").await, Some(1));
        assert_eq!(cache.get("b").await, None);
        assert_eq!(cache.get("c").await, Some(3));
    }

    #[tokio::test]
    async fn test_overwrite_does_not_evict() {
        let cache: InMemorySessionCache<i32> = InMemorySessionCache::new(2);
        cache.put("a", 1).await;
        cache.put("b", 2).await;
        cache.put("b", 20).await;
        assert_eq!(cache.get("a").await, Some(1));
        assert_eq!(cache.get("b").await, Some(20));
    }
}
