//! Store seams for the catalog services.
//!
//! The catalog crate only sees these traits, so services are built around
//! `Arc<dyn DeviceStore>` / `Arc<dyn FavoriteStore>` and tests can hand them
//! in-memory doubles. [`PgStore`] delegates to the repositories.

use async_trait::async_trait;
use devicehub_core::query::DeviceQuery;

use crate::models::device::{CreateDevice, Device, MetaColumn, UpdateDevice};
use crate::repositories::{DeviceRepo, FavoriteRepo};
use crate::DbPool;

/// Relational access to devices.
#[async_trait]
pub trait DeviceStore: Send + Sync {
    /// Run a listing query, binding `query.args` positionally.
    async fn query_devices(&self, query: &DeviceQuery) -> Result<Vec<Device>, sqlx::Error>;

    async fn insert_device(
        &self,
        owner_id: &str,
        input: &CreateDevice,
    ) -> Result<Device, sqlx::Error>;

    async fn find_device(&self, id: &str) -> Result<Option<Device>, sqlx::Error>;

    /// `None` when no row matches both `id` and `owner_id`.
    async fn update_owned(
        &self,
        id: &str,
        owner_id: &str,
        input: &UpdateDevice,
    ) -> Result<Option<Device>, sqlx::Error>;

    /// `false` when no row matches both `id` and `owner_id`.
    async fn delete_owned(&self, id: &str, owner_id: &str) -> Result<bool, sqlx::Error>;

    /// `None` when no row matches both `id` and `owner_id`.
    async fn set_availability_owned(
        &self,
        id: &str,
        owner_id: &str,
        available: bool,
    ) -> Result<Option<Device>, sqlx::Error>;

    async fn distinct_values(&self, column: MetaColumn) -> Result<Vec<String>, sqlx::Error>;

    async fn trending(&self, limit: i64) -> Result<Vec<Device>, sqlx::Error>;

    /// Round-trip to the backend, for health reporting.
    async fn ping(&self) -> Result<(), sqlx::Error>;
}

/// The user-to-device bookmark relation.
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// `false` when the pair already existed.
    async fn add_favorite(&self, user_id: &str, device_id: &str) -> Result<bool, sqlx::Error>;

    /// `false` when the pair did not exist.
    async fn remove_favorite(&self, user_id: &str, device_id: &str) -> Result<bool, sqlx::Error>;

    async fn favorites_for_user(&self, user_id: &str) -> Result<Vec<Device>, sqlx::Error>;
}

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl DeviceStore for PgStore {
    async fn query_devices(&self, query: &DeviceQuery) -> Result<Vec<Device>, sqlx::Error> {
        DeviceRepo::list(&self.pool, query).await
    }

    async fn insert_device(
        &self,
        owner_id: &str,
        input: &CreateDevice,
    ) -> Result<Device, sqlx::Error> {
        DeviceRepo::create(&self.pool, owner_id, input).await
    }

    async fn find_device(&self, id: &str) -> Result<Option<Device>, sqlx::Error> {
        DeviceRepo::find_by_id(&self.pool, id).await
    }

    async fn update_owned(
        &self,
        id: &str,
        owner_id: &str,
        input: &UpdateDevice,
    ) -> Result<Option<Device>, sqlx::Error> {
        DeviceRepo::update_owned(&self.pool, id, owner_id, input).await
    }

    async fn delete_owned(&self, id: &str, owner_id: &str) -> Result<bool, sqlx::Error> {
        DeviceRepo::delete_owned(&self.pool, id, owner_id).await
    }

    async fn set_availability_owned(
        &self,
        id: &str,
        owner_id: &str,
        available: bool,
    ) -> Result<Option<Device>, sqlx::Error> {
        DeviceRepo::set_availability_owned(&self.pool, id, owner_id, available).await
    }

    async fn distinct_values(&self, column: MetaColumn) -> Result<Vec<String>, sqlx::Error> {
        DeviceRepo::distinct_values(&self.pool, column).await
    }

    async fn trending(&self, limit: i64) -> Result<Vec<Device>, sqlx::Error> {
        DeviceRepo::list_trending(&self.pool, limit).await
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }
}

#[async_trait]
impl FavoriteStore for PgStore {
    async fn add_favorite(&self, user_id: &str, device_id: &str) -> Result<bool, sqlx::Error> {
        FavoriteRepo::add(&self.pool, user_id, device_id).await
    }

    async fn remove_favorite(&self, user_id: &str, device_id: &str) -> Result<bool, sqlx::Error> {
        FavoriteRepo::remove(&self.pool, user_id, device_id).await
    }

    async fn favorites_for_user(&self, user_id: &str) -> Result<Vec<Device>, sqlx::Error> {
        FavoriteRepo::list_devices_for_user(&self.pool, user_id).await
    }
}
