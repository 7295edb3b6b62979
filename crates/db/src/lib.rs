//! Postgres access for the device catalog.
//!
//! - [`models`] -- row structs and write DTOs.
//! - [`repositories`] -- zero-sized repos with async query methods taking `&PgPool`.
//! - [`store`] -- the [`store::DeviceStore`] / [`store::FavoriteStore`] seams the
//!   catalog services are written against, and their Postgres implementation.

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

pub mod models;
pub mod repositories;
pub mod store;

pub type DbPool = sqlx::PgPool;

/// Connection pool settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_url: String,
    /// Pool size (default: `20`).
    pub max_connections: u32,
    /// How long a request may wait for a free connection (default: `5`).
    pub acquire_timeout_secs: u64,
    /// Server-side `statement_timeout` in milliseconds (default: `5000`).
    pub statement_timeout_ms: u64,
}

impl DbConfig {
    /// Load database configuration from environment variables.
    ///
    /// | Env Var                   | Required | Default |
    /// |---------------------------|----------|---------|
    /// | `DATABASE_URL`            | **yes**  | --      |
    /// | `DB_MAX_CONNECTIONS`      | no       | `20`    |
    /// | `DB_ACQUIRE_TIMEOUT_SECS` | no       | `5`     |
    /// | `DB_STATEMENT_TIMEOUT_MS` | no       | `5000`  |
    ///
    /// # Panics
    ///
    /// Panics if `DATABASE_URL` is missing or a numeric variable does not parse.
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .expect("DB_MAX_CONNECTIONS must be a valid u32");

        let acquire_timeout_secs: u64 = std::env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("DB_ACQUIRE_TIMEOUT_SECS must be a valid u64");

        let statement_timeout_ms: u64 = std::env::var("DB_STATEMENT_TIMEOUT_MS")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("DB_STATEMENT_TIMEOUT_MS must be a valid u64");

        Self {
            database_url,
            max_connections,
            acquire_timeout_secs,
            statement_timeout_ms,
        }
    }
}

/// Create a connection pool.
///
/// Every connection carries a `statement_timeout`, so a slow query fails
/// instead of pinning a worker.
pub async fn create_pool(config: &DbConfig) -> Result<DbPool, sqlx::Error> {
    let options = PgConnectOptions::from_str(&config.database_url)?.options([(
        "statement_timeout",
        format!("{}ms", config.statement_timeout_ms),
    )]);

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(options)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
