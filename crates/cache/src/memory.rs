//! In-process backend.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::error::CacheResult;
use crate::CacheStore;

struct Entry {
    value: Vec<u8>,
    expires_at: Instant,
}

/// Process-local [`CacheStore`] with lazy expiry.
///
/// Expired entries are invisible to `get` and are swept on the next `set`.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|e| e.expires_at > now)
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|e| e.expires_at > Instant::now())
            .map(|e| e.value.clone()))
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, e| e.expires_at > now);
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_vec(),
                expires_at: now + ttl,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn miss_on_unknown_key() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("devices:nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_then_get() {
        let cache = MemoryCache::new();
        cache
            .set("devices:a", b"[]", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cache.get("devices:a").await.unwrap(), Some(b"[]".to_vec()));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn set_overwrites() {
        let cache = MemoryCache::new();
        let ttl = Duration::from_secs(60);
        cache.set("k", b"one", ttl).await.unwrap();
        cache.set("k", b"two", ttl).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), Some(b"two".to_vec()));
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let cache = MemoryCache::new();
        cache
            .set("devices:a", b"[1]", Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(cache.get("devices:a").await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get("devices:a").await.unwrap().is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entries_swept_on_set() {
        let cache = MemoryCache::new();
        cache.set("old", b"x", Duration::from_secs(1)).await.unwrap();
        tokio::time::advance(Duration::from_secs(5)).await;
        cache.set("new", b"y", Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.entries.read().await.len(), 1);
    }
}
