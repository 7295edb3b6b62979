//! Device models and DTOs.

use devicehub_core::types::{DeviceId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `devices` table.
///
/// Also the cached listing payload, hence `Deserialize`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price_per_day: f64,
    pub available: bool,
    pub image_url: String,
    pub owner_id: UserId,
    pub city: String,
    pub region: String,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Write DTOs
// ---------------------------------------------------------------------------

/// Payload for `POST /devices`.
///
/// There is no owner field: the owner is always the authenticated caller, and
/// an `owner_id` key in the request body is ignored during deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDevice {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub price_per_day: f64,
    #[serde(default = "default_available")]
    pub available: bool,
    /// Public URL returned by object storage; stored verbatim.
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub region: String,
}

/// Payload for `PUT /devices/{id}`. Replaces every mutable field.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDevice {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub price_per_day: f64,
    pub available: bool,
    #[serde(default)]
    pub image_url: String,
}

/// Payload for `PATCH /devices/{id}/availability`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetAvailability {
    pub available: bool,
}

fn default_available() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Metadata lookups
// ---------------------------------------------------------------------------

/// Columns exposed through the distinct-value lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaColumn {
    Category,
    City,
    Region,
}

impl MetaColumn {
    pub fn column(self) -> &'static str {
        match self {
            MetaColumn::Category => "category",
            MetaColumn::City => "city",
            MetaColumn::Region => "region",
        }
    }
}
