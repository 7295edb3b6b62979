use axum::routing::get;
use axum::Router;

use crate::handlers::meta;
use crate::state::AppState;

/// Catalog lookups used to populate filter pickers.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(meta::list_categories))
        .route("/cities", get(meta::list_cities))
        .route("/regions", get(meta::list_regions))
}
