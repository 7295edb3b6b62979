//! Handlers for device listings, reads and owner-guarded writes.
//!
//! Reads are public. Writes take [`AuthUser`] and pass its identity down as
//! the owner; a request body never chooses the owner.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use devicehub_core::filter::DeviceFilterParams;
use devicehub_db::models::device::{CreateDevice, SetAvailability, UpdateDevice};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /devices/trending`.
#[derive(Debug, Default, Deserialize)]
pub struct TrendingParams {
    /// Kept as a string so a malformed value falls back to the default.
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub available: bool,
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /api/v1/devices
///
/// Filtered, sorted, paginated listing. Unparseable parameters fall back to
/// their defaults.
pub async fn list_devices(
    State(state): State<AppState>,
    Query(params): Query<DeviceFilterParams>,
) -> AppResult<impl IntoResponse> {
    let filter = params.into_filter();
    let devices = state.listings.list(&filter).await?;

    Ok(Json(DataResponse { data: devices }))
}

/// GET /api/v1/devices/trending
pub async fn trending_devices(
    State(state): State<AppState>,
    Query(params): Query<TrendingParams>,
) -> AppResult<impl IntoResponse> {
    let limit = params.limit.as_deref().and_then(|s| s.trim().parse().ok());
    let devices = state.listings.trending(limit).await?;

    Ok(Json(DataResponse { data: devices }))
}

/// GET /api/v1/devices/{id}
pub async fn get_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let device = state.devices.get(&id).await?;

    Ok(Json(DataResponse { data: device }))
}

/// GET /api/v1/devices/{id}/availability
pub async fn get_availability(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let available = state.devices.availability(&id).await?;

    Ok(Json(DataResponse {
        data: AvailabilityResponse { available },
    }))
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// POST /api/v1/devices
///
/// Returns 201 with the stored device, including its generated id.
pub async fn create_device(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateDevice>,
) -> AppResult<impl IntoResponse> {
    let device = state.devices.create(&auth.user_id, input).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: device })))
}

/// PUT /api/v1/devices/{id}
pub async fn update_device(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateDevice>,
) -> AppResult<impl IntoResponse> {
    let device = state.devices.update(&id, &auth.user_id, input).await?;

    Ok(Json(DataResponse { data: device }))
}

/// DELETE /api/v1/devices/{id}
pub async fn delete_device(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.devices.delete(&id, &auth.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/devices/{id}/availability
pub async fn set_availability(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<SetAvailability>,
) -> AppResult<impl IntoResponse> {
    let device = state
        .devices
        .set_availability(&id, &auth.user_id, input.available)
        .await?;

    Ok(Json(DataResponse { data: device }))
}
