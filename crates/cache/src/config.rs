use std::time::Duration;

/// Default lifetime of a cached listing, in seconds.
pub const DEFAULT_TTL_SECS: u64 = 60;

/// Default bound on a single cache round-trip, in milliseconds.
pub const DEFAULT_OP_TIMEOUT_MS: u64 = 500;

/// Cache configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Redis connection URL. `None` selects the in-process cache.
    pub redis_url: Option<String>,
    /// Lifetime of cached listings in seconds (default: `60`).
    pub ttl_secs: u64,
    /// Per-operation timeout in milliseconds (default: `500`).
    pub op_timeout_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            ttl_secs: DEFAULT_TTL_SECS,
            op_timeout_ms: DEFAULT_OP_TIMEOUT_MS,
        }
    }
}

impl CacheConfig {
    /// Load cache configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default |
    /// |----------------------|---------|
    /// | `REDIS_URL`          | unset   |
    /// | `CACHE_TTL_SECS`     | `60`    |
    /// | `CACHE_OP_TIMEOUT_MS`| `500`   |
    pub fn from_env() -> Self {
        let redis_url = std::env::var("REDIS_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let ttl_secs: u64 = std::env::var("CACHE_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_TTL_SECS.to_string())
            .parse()
            .expect("CACHE_TTL_SECS must be a valid u64");

        let op_timeout_ms: u64 = std::env::var("CACHE_OP_TIMEOUT_MS")
            .unwrap_or_else(|_| DEFAULT_OP_TIMEOUT_MS.to_string())
            .parse()
            .expect("CACHE_OP_TIMEOUT_MS must be a valid u64");

        Self {
            redis_url,
            ttl_secs,
            op_timeout_ms,
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn op_timeout(&self) -> Duration {
        Duration::from_millis(self.op_timeout_ms)
    }
}
