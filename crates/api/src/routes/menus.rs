//! Route definitions for the capability gate.

use axum::routing::get;
use axum::Router;

use crate::handlers::menus;
use crate::state::AppState;

/// Routes merged at the `/api/v1` root.
///
/// ```text
/// GET /menus/{table}  -> allowed_items (table: map | sidebar | admin)
/// GET /permissions    -> permissions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/menus/{table}", get(menus::allowed_items))
        .route("/permissions", get(menus::permissions))
}
