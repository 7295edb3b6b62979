//! Cache-aside listing of devices plus the uncached catalog lookups.
//!
//! A `list` call derives the fingerprint of the filter and checks the cache.
//! A decodable hit is returned as-is. Otherwise the query is built, run
//! against the store, and the result is written back with the configured TTL.
//!
//! Cache trouble of any kind, including a corrupt payload, degrades to a
//! direct store query. Only store failures reach the caller.

use std::sync::Arc;
use std::time::Duration;

use devicehub_cache::CacheStore;
use devicehub_core::cache_key::listing_cache_key;
use devicehub_core::filter::{clamp_limit, DeviceFilter};
use devicehub_core::query::build_device_query;
use devicehub_db::models::device::{Device, MetaColumn};
use devicehub_db::store::DeviceStore;

use crate::error::CatalogResult;

/// Default number of trending devices.
pub const DEFAULT_TRENDING_LIMIT: i64 = 10;
/// Upper bound on the trending limit.
pub const MAX_TRENDING_LIMIT: i64 = 100;

/// Read side of the catalog.
#[derive(Clone)]
pub struct ListingService {
    store: Arc<dyn DeviceStore>,
    cache: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl ListingService {
    pub fn new(store: Arc<dyn DeviceStore>, cache: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, cache, ttl }
    }

    /// List devices matching `filter`, serving from cache when possible.
    ///
    /// Returns an empty vec when nothing matches.
    pub async fn list(&self, filter: &DeviceFilter) -> CatalogResult<Vec<Device>> {
        let key = listing_cache_key(filter);

        if let Some(devices) = self.read_cached(&key).await {
            tracing::debug!(cache_key = %key, count = devices.len(), "Listing cache hit");
            return Ok(devices);
        }

        let query = build_device_query(filter);
        let devices = self.store.query_devices(&query).await?;
        tracing::debug!(cache_key = %key, count = devices.len(), "Listing cache miss, queried store");

        self.write_cached(&key, &devices).await;
        Ok(devices)
    }

    /// Distinct non-empty categories, sorted.
    pub async fn categories(&self) -> CatalogResult<Vec<String>> {
        Ok(self.store.distinct_values(MetaColumn::Category).await?)
    }

    /// Distinct non-empty cities, sorted.
    pub async fn cities(&self) -> CatalogResult<Vec<String>> {
        Ok(self.store.distinct_values(MetaColumn::City).await?)
    }

    /// Distinct non-empty regions, sorted.
    pub async fn regions(&self) -> CatalogResult<Vec<String>> {
        Ok(self.store.distinct_values(MetaColumn::Region).await?)
    }

    /// Most-favorited devices first. `limit` falls back to 10 when missing
    /// or below 1 and is capped at 100.
    pub async fn trending(&self, limit: Option<i64>) -> CatalogResult<Vec<Device>> {
        let limit = clamp_limit(limit, DEFAULT_TRENDING_LIMIT, MAX_TRENDING_LIMIT);
        Ok(self.store.trending(limit).await?)
    }

    /// `None` on miss, backend error, or undecodable payload.
    async fn read_cached(&self, key: &str) -> Option<Vec<Device>> {
        let bytes = match self.cache.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(cache_key = %key, error = %e, "Cache read failed, falling back to store");
                return None;
            }
        };

        match serde_json::from_slice::<Vec<Device>>(&bytes) {
            Ok(devices) => Some(devices),
            Err(e) => {
                tracing::warn!(cache_key = %key, error = %e, "Discarding undecodable cache entry");
                None
            }
        }
    }

    /// Best effort; failures are logged and dropped.
    async fn write_cached(&self, key: &str, devices: &[Device]) {
        let bytes = match serde_json::to_vec(devices) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(cache_key = %key, error = %e, "Failed to encode listing for cache");
                return;
            }
        };

        if let Err(e) = self.cache.set(key, &bytes, self.ttl).await {
            tracing::warn!(cache_key = %key, error = %e, "Cache write failed");
        }
    }
}
