//! Shared helpers for HTTP-level integration tests.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use sqlx::PgPool;
use tower::ServiceExt;

use planview_api::config::ServerConfig;
use planview_api::router::build_app_router;
use planview_api::state::AppState;
use planview_api::storage::ArtifactStore;
use planview_core::permissions::PermissionsConfig;

/// Build a test `ServerConfig` with safe defaults.
///
/// The converter command is `cp`, which stands in for a converter that
/// writes its destination file, so dxf imports convert successfully.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        storage_root: std::env::temp_dir()
            .join(format!("planview-test-{}", uuid::Uuid::now_v7().simple()))
            .to_string_lossy()
            .to_string(),
        converter_command: "cp".to_string(),
        conversion_timeout_secs: 10,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool. This mirrors the router construction in `main.rs`
/// so integration tests exercise the same middleware stack that production
/// uses.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config())
}

/// Same as [`build_test_app`] but with an explicit config (used to swap the
/// converter command for failure scenarios).
pub fn build_test_app_with(pool: PgPool, config: ServerConfig) -> Router {
    let store = Arc::new(ArtifactStore::new(config.storage_root.clone()));
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        permissions: Arc::new(PermissionsConfig::default()),
        store,
    };
    build_app_router(state, &config)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn get_with_role(app: Router, uri: &str, role: &str) -> Response<Body> {
    app.oneshot(
        Request::get(uri)
            .header("x-user-role", role)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::put(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::delete(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Send a multipart blueprint upload to an import endpoint.
pub async fn post_blueprint(
    app: Router,
    uri: &str,
    filename: &str,
    bytes: &[u8],
    name: Option<&str>,
) -> Response<Body> {
    let boundary = "planview-test-boundary";
    let mut body = Vec::new();

    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"blueprint\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n");

    if let Some(name) = name {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"name\"\r\n\r\n");
        body.extend_from_slice(name.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    app.oneshot(
        Request::post(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body into parsed JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    use http_body_util::BodyExt;
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a site via the API and return its id.
pub async fn create_site(pool: &PgPool, slug: &str) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/sites",
        serde_json::json!({"name": format!("Site {slug}"), "slug": slug}),
    )
    .await;
    body_json(response).await["id"].as_i64().unwrap()
}

/// Create a layer via the API and return its id.
pub async fn create_layer(
    pool: &PgPool,
    map_id: i64,
    key: &str,
    z_index: i32,
    default_visible: bool,
) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/v1/maps/{map_id}/layers"),
        serde_json::json!({
            "key": key,
            "display_name": format!("Layer {key}"),
            "layer_type": "overlay",
            "z_index": z_index,
            "default_visible": default_visible,
        }),
    )
    .await;
    body_json(response).await["id"].as_i64().unwrap()
}

/// Create a viewport via the API and return its id.
pub async fn create_viewport(pool: &PgPool, map_id: i64, slug: &str, is_root: bool) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/v1/maps/{map_id}/viewports"),
        serde_json::json!({
            "name": format!("Viewport {slug}"),
            "slug": slug,
            "is_root": is_root,
            "bounds": {"x": 0, "y": 0, "width": 800, "height": 600},
        }),
    )
    .await;
    body_json(response).await["id"].as_i64().unwrap()
}

/// Import an SVG blueprint and return the created map's id.
pub async fn import_svg_map(pool: &PgPool, site_id: i64, name: &str) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_blueprint(
        app,
        &format!("/api/v1/sites/{site_id}/maps/import"),
        "plan.svg",
        b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>",
        Some(name),
    )
    .await;
    body_json(response).await["id"].as_i64().unwrap()
}
