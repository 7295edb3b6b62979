pub mod devices;
pub mod health;
pub mod meta;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /devices                          list (public), create (auth)
/// /devices/trending                 most favorited (public)
/// /devices/favorite                 caller's favorites (auth)
/// /devices/{id}                     get (public), update, delete (auth)
/// /devices/{id}/availability        get (public), set (auth)
/// /devices/{id}/favorite            add, remove (auth)
///
/// /categories                       distinct categories
/// /cities                           distinct cities
/// /regions                          distinct regions
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/devices", devices::router())
        .merge(meta::router())
}
