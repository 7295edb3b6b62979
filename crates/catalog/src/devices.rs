//! Device reads and ownership-guarded writes.

use std::sync::Arc;

use devicehub_core::error::CoreError;
use devicehub_core::validation::{validate_device_name, validate_price};
use devicehub_db::models::device::{CreateDevice, Device, UpdateDevice};
use devicehub_db::store::DeviceStore;

use crate::error::{require_identity, CatalogResult};

const ENTITY: &str = "Device";

/// Write side of the catalog, plus unrestricted reads by id.
///
/// Writes never touch the listing cache; listings converge once their
/// entries expire.
#[derive(Clone)]
pub struct DeviceService {
    store: Arc<dyn DeviceStore>,
}

impl DeviceService {
    pub fn new(store: Arc<dyn DeviceStore>) -> Self {
        Self { store }
    }

    /// Insert a device owned by `owner_id`.
    pub async fn create(&self, owner_id: &str, input: CreateDevice) -> CatalogResult<Device> {
        require_identity(owner_id)?;
        validate_device_name(&input.name)?;
        validate_price(input.price_per_day)?;

        let device = self.store.insert_device(owner_id, &input).await?;
        tracing::info!(device_id = %device.id, owner_id = %owner_id, "Device created");
        Ok(device)
    }

    pub async fn get(&self, id: &str) -> CatalogResult<Device> {
        self.store
            .find_device(id)
            .await?
            .ok_or_else(|| not_found(id).into())
    }

    pub async fn availability(&self, id: &str) -> CatalogResult<bool> {
        Ok(self.get(id).await?.available)
    }

    /// Replace the mutable fields of a device owned by `owner_id`.
    pub async fn update(
        &self,
        id: &str,
        owner_id: &str,
        input: UpdateDevice,
    ) -> CatalogResult<Device> {
        require_identity(owner_id)?;
        validate_device_name(&input.name)?;
        validate_price(input.price_per_day)?;

        let device = self
            .store
            .update_owned(id, owner_id, &input)
            .await?
            .ok_or_else(|| not_found_or_forbidden(id))?;
        tracing::info!(device_id = %id, owner_id = %owner_id, "Device updated");
        Ok(device)
    }

    pub async fn delete(&self, id: &str, owner_id: &str) -> CatalogResult<()> {
        require_identity(owner_id)?;

        if !self.store.delete_owned(id, owner_id).await? {
            return Err(not_found_or_forbidden(id).into());
        }
        tracing::info!(device_id = %id, owner_id = %owner_id, "Device deleted");
        Ok(())
    }

    pub async fn set_availability(
        &self,
        id: &str,
        owner_id: &str,
        available: bool,
    ) -> CatalogResult<Device> {
        require_identity(owner_id)?;

        let device = self
            .store
            .set_availability_owned(id, owner_id, available)
            .await?
            .ok_or_else(|| not_found_or_forbidden(id))?;
        tracing::info!(device_id = %id, owner_id = %owner_id, available, "Device availability changed");
        Ok(device)
    }

    /// Whether the store answers a trivial query.
    pub async fn store_healthy(&self) -> bool {
        match self.store.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Store health check failed");
                false
            }
        }
    }
}

fn not_found(id: &str) -> CoreError {
    CoreError::NotFound {
        entity: ENTITY,
        id: id.to_string(),
    }
}

fn not_found_or_forbidden(id: &str) -> CoreError {
    CoreError::NotFoundOrForbidden {
        entity: ENTITY,
        id: id.to_string(),
    }
}
