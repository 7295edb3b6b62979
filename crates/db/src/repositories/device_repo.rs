//! Repository for the `devices` table.
//!
//! Every write that changes an existing row is guarded by
//! `id = $1 AND owner_id = $2`; a guard miss comes back as `None` / `false`
//! and the caller decides how to report it.

use devicehub_core::query::{DeviceQuery, QueryArg, DEVICE_COLUMNS};
use sqlx::PgPool;

use crate::models::device::{CreateDevice, Device, MetaColumn, UpdateDevice};

/// `DEVICE_COLUMNS` qualified with the `d` alias, for joins.
pub(crate) const DEVICE_COLUMNS_D: &str = "\
    d.id, d.name, d.description, d.category, d.price_per_day, d.available, \
    d.image_url, d.owner_id, d.city, d.region, d.created_at, d.updated_at";

/// Provides CRUD operations for devices.
pub struct DeviceRepo;

impl DeviceRepo {
    /// Insert a new device owned by `owner_id`. Returns the row with its
    /// generated id and timestamps.
    pub async fn create(
        pool: &PgPool,
        owner_id: &str,
        input: &CreateDevice,
    ) -> Result<Device, sqlx::Error> {
        let query = format!(
            "INSERT INTO devices (\
                name, description, category, price_per_day, available, \
                image_url, owner_id, city, region\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {DEVICE_COLUMNS}"
        );
        sqlx::query_as::<_, Device>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.category)
            .bind(input.price_per_day)
            .bind(input.available)
            .bind(&input.image_url)
            .bind(owner_id)
            .bind(&input.city)
            .bind(&input.region)
            .fetch_one(pool)
            .await
    }

    /// Execute a listing query produced by
    /// [`build_device_query`](devicehub_core::query::build_device_query),
    /// binding its arguments in order.
    pub async fn list(pool: &PgPool, query: &DeviceQuery) -> Result<Vec<Device>, sqlx::Error> {
        tracing::debug!(sql = %query.sql, arg_count = query.args.len(), "Executing device listing");

        let mut q = sqlx::query_as::<_, Device>(&query.sql);

        for arg in &query.args {
            q = match arg {
                QueryArg::Text(value) => q.bind(value.as_str()),
                QueryArg::Bool(value) => q.bind(*value),
                QueryArg::Float(value) => q.bind(*value),
                QueryArg::Int(value) => q.bind(*value),
            };
        }

        q.fetch_all(pool).await
    }

    /// Find a device by ID.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Device>, sqlx::Error> {
        let query = format!("SELECT {DEVICE_COLUMNS} FROM devices WHERE id = $1");
        sqlx::query_as::<_, Device>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replace the mutable fields of a device the caller owns.
    pub async fn update_owned(
        pool: &PgPool,
        id: &str,
        owner_id: &str,
        input: &UpdateDevice,
    ) -> Result<Option<Device>, sqlx::Error> {
        let query = format!(
            "UPDATE devices SET \
                name = $3, \
                description = $4, \
                category = $5, \
                price_per_day = $6, \
                available = $7, \
                image_url = $8, \
                updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {DEVICE_COLUMNS}"
        );
        sqlx::query_as::<_, Device>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.category)
            .bind(input.price_per_day)
            .bind(input.available)
            .bind(&input.image_url)
            .fetch_optional(pool)
            .await
    }

    /// Delete a device the caller owns. Returns true if a row was deleted.
    pub async fn delete_owned(pool: &PgPool, id: &str, owner_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM devices WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Flip the availability flag of a device the caller owns.
    pub async fn set_availability_owned(
        pool: &PgPool,
        id: &str,
        owner_id: &str,
        available: bool,
    ) -> Result<Option<Device>, sqlx::Error> {
        let query = format!(
            "UPDATE devices SET available = $3, updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {DEVICE_COLUMNS}"
        );
        sqlx::query_as::<_, Device>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(available)
            .fetch_optional(pool)
            .await
    }

    /// Distinct non-empty values of a metadata column, sorted ascending.
    pub async fn distinct_values(
        pool: &PgPool,
        column: MetaColumn,
    ) -> Result<Vec<String>, sqlx::Error> {
        let column = column.column();
        let query = format!(
            "SELECT DISTINCT {column} FROM devices \
             WHERE {column} <> '' \
             ORDER BY {column}"
        );
        sqlx::query_scalar::<_, String>(&query).fetch_all(pool).await
    }

    /// Devices with the most favorites first; ties go to the newest device.
    pub async fn list_trending(pool: &PgPool, limit: i64) -> Result<Vec<Device>, sqlx::Error> {
        let query = format!(
            "SELECT {DEVICE_COLUMNS_D} \
             FROM devices d \
             LEFT JOIN favorites f ON f.device_id = d.id \
             GROUP BY d.id \
             ORDER BY COUNT(f.device_id) DESC, d.created_at DESC, d.id ASC \
             LIMIT $1"
        );
        sqlx::query_as::<_, Device>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
