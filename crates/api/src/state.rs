use std::sync::Arc;

use devicehub_cache::CacheStore;
use devicehub_catalog::{DeviceService, FavoriteService, ListingService};
use devicehub_db::store::{DeviceStore, FavoriteStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every field is an `Arc` or wraps one.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub listings: ListingService,
    pub devices: DeviceService,
    pub favorites: FavoriteService,
}

impl AppState {
    /// Wire the catalog services to one store and one cache.
    pub fn new<S>(config: ServerConfig, store: Arc<S>, cache: Arc<dyn CacheStore>) -> Self
    where
        S: DeviceStore + FavoriteStore + 'static,
    {
        let device_store: Arc<dyn DeviceStore> = store.clone();
        let favorite_store: Arc<dyn FavoriteStore> = store;

        Self {
            listings: ListingService::new(device_store.clone(), cache, config.cache.ttl()),
            devices: DeviceService::new(device_store),
            favorites: FavoriteService::new(favorite_store),
            config: Arc::new(config),
        }
    }
}
