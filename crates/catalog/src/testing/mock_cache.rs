//! Recording cache double.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use devicehub_cache::{CacheError, CacheResult, CacheStore};
use tokio::sync::RwLock;

/// [`CacheStore`] double that never expires entries and records traffic.
///
/// With `fail(true)` every call returns [`CacheError::Timeout`], which is how
/// an unreachable backend presents once its op timeout fires.
#[derive(Clone, Default)]
pub struct MockCache {
    entries: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    ttls: Arc<RwLock<Vec<Duration>>>,
    gets: Arc<AtomicUsize>,
    sets: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl MockCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn get_calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn set_calls(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    /// TTLs passed to `set`, in call order.
    pub async fn ttls(&self) -> Vec<Duration> {
        self.ttls.read().await.clone()
    }

    /// Store bytes directly, e.g. a corrupt payload.
    pub async fn put_raw(&self, key: &str, value: &[u8]) {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_vec());
    }

    pub async fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    fn check(&self) -> CacheResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CacheError::Timeout(Duration::from_millis(500)));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheStore for MockCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.ttls.write().await.push(ttl);
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
