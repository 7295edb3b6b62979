//! In-memory collaborators for exercising the catalog without Postgres or
//! Redis.
//!
//! - [`MemoryStore`] -- implements both store traits and answers listing
//!   queries by interpreting the generated SQL.
//! - [`MockCache`] -- a never-expiring cache with call counters and failure
//!   injection.

mod memory_store;
mod mock_cache;

pub use memory_store::MemoryStore;
pub use mock_cache::MockCache;

use devicehub_db::models::device::CreateDevice;

/// A valid device payload with the given name and price.
pub fn device_input(name: &str, price_per_day: f64) -> CreateDevice {
    CreateDevice {
        name: name.to_string(),
        description: String::new(),
        category: "camera".to_string(),
        price_per_day,
        available: true,
        image_url: String::new(),
        city: "Almaty".to_string(),
        region: "South".to_string(),
    }
}
