use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/categories
pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = state.listings.categories().await?;
    Ok(Json(DataResponse { data: categories }))
}

/// GET /api/v1/cities
pub async fn list_cities(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let cities = state.listings.cities().await?;
    Ok(Json(DataResponse { data: cities }))
}

/// GET /api/v1/regions
pub async fn list_regions(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let regions = state.listings.regions().await?;
    Ok(Json(DataResponse { data: regions }))
}
