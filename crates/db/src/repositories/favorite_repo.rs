//! Repository for the `favorites` join table.

use sqlx::PgPool;

use crate::models::device::Device;
use crate::repositories::device_repo::DEVICE_COLUMNS_D;

/// Provides add/remove/list operations for user bookmarks.
pub struct FavoriteRepo;

impl FavoriteRepo {
    /// Bookmark a device. Returns false if the pair already existed.
    ///
    /// A missing device surfaces as a foreign-key violation (`23503`).
    pub async fn add(pool: &PgPool, user_id: &str, device_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO favorites (user_id, device_id) VALUES ($1, $2) \
             ON CONFLICT (user_id, device_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(device_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a bookmark. Returns true if a row was deleted.
    pub async fn remove(pool: &PgPool, user_id: &str, device_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND device_id = $2")
            .bind(user_id)
            .bind(device_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All devices bookmarked by a user, most recently bookmarked first.
    pub async fn list_devices_for_user(
        pool: &PgPool,
        user_id: &str,
    ) -> Result<Vec<Device>, sqlx::Error> {
        let query = format!(
            "SELECT {DEVICE_COLUMNS_D} \
             FROM devices d \
             JOIN favorites f ON f.device_id = d.id \
             WHERE f.user_id = $1 \
             ORDER BY f.created_at DESC, d.id ASC"
        );
        sqlx::query_as::<_, Device>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
