//! Catalog services: cache-aside listings, ownership-guarded device writes,
//! and favorites.
//!
//! Services hold their collaborators as `Arc<dyn ...>` handed in at
//! construction; there is no process-wide client state.

pub mod devices;
pub mod error;
pub mod favorites;
pub mod listing;
pub mod testing;

pub use devices::DeviceService;
pub use error::{CatalogError, CatalogResult};
pub use favorites::FavoriteService;
pub use listing::ListingService;
