//! The user-to-device bookmark relation.

use std::sync::Arc;

use devicehub_core::error::CoreError;
use devicehub_db::models::device::Device;
use devicehub_db::store::FavoriteStore;

use crate::error::{require_identity, CatalogResult};

/// Postgres foreign-key violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Clone)]
pub struct FavoriteService {
    store: Arc<dyn FavoriteStore>,
}

impl FavoriteService {
    pub fn new(store: Arc<dyn FavoriteStore>) -> Self {
        Self { store }
    }

    /// Bookmark a device. Adding an existing pair is a no-op.
    pub async fn add(&self, user_id: &str, device_id: &str) -> CatalogResult<()> {
        require_identity(user_id)?;

        match self.store.add_favorite(user_id, device_id).await {
            Ok(true) => {
                tracing::info!(user_id = %user_id, device_id = %device_id, "Favorite added");
                Ok(())
            }
            Ok(false) => {
                tracing::debug!(user_id = %user_id, device_id = %device_id, "Favorite already present");
                Ok(())
            }
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) =>
            {
                Err(CoreError::NotFound {
                    entity: "Device",
                    id: device_id.to_string(),
                }
                .into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a bookmark; NotFound when the pair does not exist.
    pub async fn remove(&self, user_id: &str, device_id: &str) -> CatalogResult<()> {
        require_identity(user_id)?;

        if !self.store.remove_favorite(user_id, device_id).await? {
            return Err(CoreError::NotFound {
                entity: "Favorite",
                id: device_id.to_string(),
            }
            .into());
        }
        tracing::info!(user_id = %user_id, device_id = %device_id, "Favorite removed");
        Ok(())
    }

    /// Devices bookmarked by `user_id`, most recently added first.
    pub async fn list(&self, user_id: &str) -> CatalogResult<Vec<Device>> {
        require_identity(user_id)?;
        Ok(self.store.favorites_for_user(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::error::CatalogError;
    use crate::testing::{device_input, MemoryStore};

    #[tokio::test]
    async fn add_twice_leaves_one_row() {
        let store = MemoryStore::new();
        let device = store.seed("owner", device_input("Speaker", 12.0)).await;
        let service = FavoriteService::new(Arc::new(store.clone()));

        service.add("u1", &device.id).await.unwrap();
        service.add("u1", &device.id).await.unwrap();

        assert_eq!(store.favorite_count().await, 1);
        assert_eq!(service.list("u1").await.unwrap(), vec![device]);
    }

    #[tokio::test]
    async fn add_missing_device_is_not_found() {
        let service = FavoriteService::new(Arc::new(MemoryStore::new()));

        assert_matches!(
            service.add("u1", "ghost").await,
            Err(CatalogError::Core(CoreError::NotFound { entity: "Device", .. }))
        );
    }

    #[tokio::test]
    async fn remove_missing_pair_is_not_found() {
        let store = MemoryStore::new();
        let device = store.seed("owner", device_input("Speaker", 12.0)).await;
        let service = FavoriteService::new(Arc::new(store.clone()));
        service.add("u1", &device.id).await.unwrap();

        service.remove("u1", &device.id).await.unwrap();
        assert_matches!(
            service.remove("u1", &device.id).await,
            Err(CatalogError::Core(CoreError::NotFound { entity: "Favorite", .. }))
        );
        assert!(service.list("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_is_scoped_to_user_newest_first() {
        let store = MemoryStore::new();
        let a = store.seed("owner", device_input("a", 1.0)).await;
        let b = store.seed("owner", device_input("b", 2.0)).await;
        let service = FavoriteService::new(Arc::new(store.clone()));

        service.add("u1", &a.id).await.unwrap();
        service.add("u1", &b.id).await.unwrap();
        service.add("u2", &a.id).await.unwrap();

        let ids: Vec<_> = service
            .list("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec![b.id.clone(), a.id.clone()]);
        assert_eq!(service.list("u2").await.unwrap().len(), 1);
        assert!(service.list("u3").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn requires_identity() {
        let service = FavoriteService::new(Arc::new(MemoryStore::new()));

        assert_matches!(
            service.list(" ").await,
            Err(CatalogError::Core(CoreError::Unauthorized(_)))
        );
    }
}
