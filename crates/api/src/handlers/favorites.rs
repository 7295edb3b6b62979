//! Handlers for the caller's favorites. All require [`AuthUser`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/devices/favorite
pub async fn list_favorites(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let devices = state.favorites.list(&auth.user_id).await?;

    Ok(Json(DataResponse { data: devices }))
}

/// POST /api/v1/devices/{id}/favorite
///
/// Idempotent: favoriting twice still returns 204.
pub async fn add_favorite(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> AppResult<StatusCode> {
    state.favorites.add(&auth.user_id, &device_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/devices/{id}/favorite
pub async fn remove_favorite(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> AppResult<StatusCode> {
    state.favorites.remove(&auth.user_id, &device_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
