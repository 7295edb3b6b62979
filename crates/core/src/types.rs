/// Store-generated device identifier. Opaque to everything above the store.
pub type DeviceId = String;

/// Caller identity as supplied by the upstream auth layer (the JWT `sub`).
pub type UserId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
