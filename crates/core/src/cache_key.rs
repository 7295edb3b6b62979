//! Deterministic cache keys for device listings.
//!
//! A [`DeviceFilter`] is written field by field, in a fixed order, into a
//! length-prefixed byte sequence, and the SHA-256 of that sequence is the
//! fingerprint. Nothing depends on iteration order or process state, so
//! equal filters always produce equal keys.

use sha2::{Digest, Sha256};

use crate::filter::DeviceFilter;

/// Prefix separating listing keys from anything else in the shared cache.
pub const CACHE_NAMESPACE: &str = "devices:";

/// Fingerprint a filter into a namespaced cache key.
///
/// The key is `devices:` followed by 64 lowercase hex characters.
pub fn listing_cache_key(filter: &DeviceFilter) -> String {
    let digest = Sha256::digest(canonical_bytes(filter));
    format!("{CACHE_NAMESPACE}{digest:x}")
}

/// Canonical encoding of a filter.
///
/// Page and page size are encoded as their effective values, so two filters
/// that produce the same query also share a key.
pub fn canonical_bytes(filter: &DeviceFilter) -> Vec<u8> {
    let mut buf = Vec::with_capacity(128);

    push_field(&mut buf, b"category", filter.category.as_deref().map(str::as_bytes));
    push_field(
        &mut buf,
        b"available",
        filter.available.map(|v| [u8::from(v)]).as_ref().map(|b| &b[..]),
    );
    push_field(
        &mut buf,
        b"min_price",
        filter.min_price.map(float_bytes).as_ref().map(|b| &b[..]),
    );
    push_field(
        &mut buf,
        b"max_price",
        filter.max_price.map(float_bytes).as_ref().map(|b| &b[..]),
    );
    push_field(&mut buf, b"city", filter.city.as_deref().map(str::as_bytes));
    push_field(&mut buf, b"region", filter.region.as_deref().map(str::as_bytes));
    push_field(&mut buf, b"sort", Some(filter.sort.as_str().as_bytes()));
    push_field(&mut buf, b"page", Some(&filter.effective_page().to_be_bytes()));
    push_field(
        &mut buf,
        b"page_size",
        Some(&filter.effective_page_size().to_be_bytes()),
    );

    buf
}

/// `name`, then `0` for absent or `1` + u32 length + bytes for present.
fn push_field(buf: &mut Vec<u8>, name: &[u8], value: Option<&[u8]>) {
    buf.extend_from_slice(name);
    match value {
        None => buf.push(0),
        Some(bytes) => {
            buf.push(1);
            buf.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
            buf.extend_from_slice(bytes);
        }
    }
}

fn float_bytes(value: f64) -> [u8; 8] {
    // -0.0 == 0.0, so both must encode identically.
    (value + 0.0).to_bits().to_be_bytes()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
