//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod device_repo;
pub mod favorite_repo;

pub use device_repo::DeviceRepo;
pub use favorite_repo::FavoriteRepo;
