//! Route definitions for devices and favorites, mounted at `/devices`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{devices, favorites};
use crate::state::AppState;

/// ```text
/// GET    /                      -> list_devices
/// POST   /                      -> create_device
/// GET    /trending              -> trending_devices
/// GET    /favorite              -> list_favorites
/// GET    /{id}                  -> get_device
/// PUT    /{id}                  -> update_device
/// DELETE /{id}                  -> delete_device
/// GET    /{id}/availability     -> get_availability
/// PATCH  /{id}/availability     -> set_availability
/// POST   /{id}/favorite         -> add_favorite
/// DELETE /{id}/favorite         -> remove_favorite
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(devices::list_devices).post(devices::create_device))
        .route("/trending", get(devices::trending_devices))
        .route("/favorite", get(favorites::list_favorites))
        .route(
            "/{id}",
            get(devices::get_device)
                .put(devices::update_device)
                .delete(devices::delete_device),
        )
        .route(
            "/{id}/availability",
            get(devices::get_availability).patch(devices::set_availability),
        )
        .route(
            "/{id}/favorite",
            post(favorites::add_favorite).delete(favorites::remove_favorite),
        )
}
