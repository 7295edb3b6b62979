//! Cache Store collaborator for listing results.
//!
//! The catalog talks to the cache only through [`CacheStore`]: opaque bytes
//! in, opaque bytes out, each entry with its own TTL. Two backends:
//!
//! - [`RedisCache`] -- shared Redis via a multiplexed `ConnectionManager`.
//! - [`MemoryCache`] -- process-local map, for tests and for running without
//!   `REDIS_URL`.
//!
//! Every backend round-trip is bounded by a timeout so a slow cache cannot
//! stall a request.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

pub mod config;
pub mod error;
pub mod memory;
pub mod redis_cache;

pub use config::CacheConfig;
pub use error::{CacheError, CacheResult};
pub use memory::MemoryCache;
pub use redis_cache::RedisCache;

/// Key/value store with per-entry expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// `Ok(None)` on a miss or an expired entry.
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()>;
}

/// Build the configured backend.
///
/// With `REDIS_URL` set this connects and pings Redis, failing if it is
/// unreachable. Without it, falls back to a [`MemoryCache`] that is not shared
/// between instances.
pub async fn connect(config: &CacheConfig) -> CacheResult<Arc<dyn CacheStore>> {
    match &config.redis_url {
        Some(url) => {
            let cache = RedisCache::connect(url, config.op_timeout()).await?;
            cache.ping().await?;
            tracing::info!(op_timeout_ms = config.op_timeout_ms, "Connected to Redis cache");
            Ok(Arc::new(cache))
        }
        None => {
            tracing::warn!("REDIS_URL not set, using in-process memory cache");
            Ok(Arc::new(MemoryCache::new()))
        }
    }
}
