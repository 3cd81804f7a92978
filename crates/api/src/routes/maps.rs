//! Route definitions for map-scoped resources: viewer state, composition,
//! conversion, layers, elements, and viewports.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{element, import, layer, map, viewport};
use crate::state::AppState;

/// Routes mounted at `/maps`.
///
/// ```text
/// GET    /{id}/state                          -> get_state
/// POST   /{id}/visible-layers                 -> visible_layers
/// POST   /{id}/convert                        -> convert
///
/// GET    /{map_id}/layers                     -> list
/// POST   /{map_id}/layers                     -> create
/// GET    /{map_id}/layers/{id}                -> get_by_id
/// PUT    /{map_id}/layers/{id}                -> update
/// DELETE /{map_id}/layers/{id}                -> delete
/// POST   /{map_id}/layers/{id}/toggle         -> toggle_visibility
/// GET    /{map_id}/layers/{layer_id}/elements -> list elements
/// PUT    /{map_id}/layers/{layer_id}/elements -> replace_all
/// POST   /{map_id}/layers/{layer_id}/elements -> bulk_upsert
///
/// GET    /{map_id}/viewports                  -> list
/// POST   /{map_id}/viewports                  -> create
/// GET    /{map_id}/viewports/{id}             -> get_by_id
/// PUT    /{map_id}/viewports/{id}             -> update
/// DELETE /{map_id}/viewports/{id}             -> delete
/// POST   /{map_id}/viewports/{id}/history     -> record_history
/// GET    /{map_id}/viewports/{id}/history     -> list_history
/// ```
pub fn router() -> Router<AppState> {
    let layer_routes = Router::new()
        .route("/", get(layer::list).post(layer::create))
        .route(
            "/{id}",
            get(layer::get_by_id)
                .put(layer::update)
                .delete(layer::delete),
        )
        .route("/{id}/toggle", post(layer::toggle_visibility))
        .route(
            "/{layer_id}/elements",
            get(element::list)
                .put(element::replace_all)
                .post(element::bulk_upsert),
        );

    let viewport_routes = Router::new()
        .route("/", get(viewport::list).post(viewport::create))
        .route(
            "/{id}",
            get(viewport::get_by_id)
                .put(viewport::update)
                .delete(viewport::delete),
        )
        .route(
            "/{id}/history",
            get(viewport::list_history).post(viewport::record_history),
        );

    Router::new()
        .route("/{id}/state", get(map::get_state))
        .route("/{id}/visible-layers", post(map::visible_layers))
        .route("/{id}/convert", post(import::convert))
        .nest("/{map_id}/layers", layer_routes)
        .nest("/{map_id}/viewports", viewport_routes)
}
