pub mod health;
pub mod maps;
pub mod menus;
pub mod sites;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /sites                                           list, create
/// /sites/{id}                                      get, update, delete
/// /sites/{site_id}/maps                            list (ordered by sequence)
/// /sites/{site_id}/maps/import                     multipart blueprint upload (POST)
/// /sites/{site_id}/maps/{id}                       manifest (GET), update (PUT),
///                                                  cascade delete (DELETE)
///
/// /maps/{id}/state                                 manifest + viewer state (GET)
/// /maps/{id}/visible-layers                        composition engine (POST)
/// /maps/{id}/convert                               conversion re-dispatch (POST)
///
/// /maps/{map_id}/layers                            list, create
/// /maps/{map_id}/layers/{id}                       get, update, delete
/// /maps/{map_id}/layers/{id}/toggle                flip default visibility (POST)
/// /maps/{map_id}/layers/{layer_id}/elements        list (GET), replace-all (PUT),
///                                                  bulk-upsert (POST)
///
/// /maps/{map_id}/viewports                         list, create
/// /maps/{map_id}/viewports/{id}                    get, update, delete
/// /maps/{map_id}/viewports/{id}/history            append (POST), list (GET)
///
/// /menus/{table}                                   allowed menu items (GET)
/// /permissions                                     caller's permission set (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Sites plus site-scoped map listing, import, manifest, delete.
        .nest("/sites", sites::router())
        // Map-scoped layers, elements, viewports, state, and conversion.
        .nest("/maps", maps::router())
        // Capability gate: menus and permission lookup.
        .merge(menus::router())
}
