//! Bearer-token identity.
//!
//! Tokens are minted by an upstream identity provider sharing `JWT_SECRET`;
//! this service only validates them and reads the `sub` claim.

pub mod jwt;
