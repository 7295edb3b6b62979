//! Pure domain logic for the device catalog.
//!
//! Nothing in this crate performs I/O: it turns listing criteria into cache
//! keys and parameterized SQL, and defines the error taxonomy shared by every
//! layer above it.

pub mod cache_key;
pub mod error;
pub mod filter;
pub mod query;
pub mod types;
pub mod validation;
