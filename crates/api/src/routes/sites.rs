//! Route definitions for the `/sites` resource.
//!
//! Also nests the site-scoped map routes (listing, import, manifest,
//! cascade delete) under `/sites/{site_id}/maps`.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use planview_core::intake::MAX_UPLOAD_BYTES;

use crate::handlers::{import, map, site};
use crate::state::AppState;

/// Routes mounted at `/sites`.
///
/// ```text
/// GET    /                            -> list
/// POST   /                            -> create
/// GET    /{id}                        -> get_by_id
/// PUT    /{id}                        -> update
/// DELETE /{id}                        -> delete
///
/// GET    /{site_id}/maps              -> list_by_site
/// POST   /{site_id}/maps/import       -> import (multipart)
/// GET    /{site_id}/maps/{id}         -> get_manifest
/// PUT    /{site_id}/maps/{id}         -> update
/// DELETE /{site_id}/maps/{id}         -> delete (cascade)
/// ```
pub fn router() -> Router<AppState> {
    // The intake cap is enforced by classify_upload; the transport limit
    // sits above it so oversize uploads reach our validation error.
    let import_body_limit = DefaultBodyLimit::max(MAX_UPLOAD_BYTES as usize + 1024 * 1024);

    let map_routes = Router::new()
        .route("/", get(map::list_by_site))
        .route(
            "/import",
            post(import::import).layer(import_body_limit),
        )
        .route(
            "/{id}",
            get(map::get_manifest)
                .put(map::update)
                .delete(import::delete),
        );

    Router::new()
        .route("/", get(site::list).post(site::create))
        .route(
            "/{id}",
            get(site::get_by_id).put(site::update).delete(site::delete),
        )
        .nest("/{site_id}/maps", map_routes)
}
