//! Request extractors.
//!
//! - [`auth::AuthUser`] -- the caller identity from a JWT Bearer token.

pub mod auth;
