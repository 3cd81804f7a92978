//! HTTP-level integration tests for the capability gate endpoints.
//!
//! The caller's role arrives in the `x-user-role` header; a missing header
//! is a 403, never a default role.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_with_role};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_operator_map_menu_is_filtered_in_declared_order(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_with_role(app, "/api/v1/menus/map", "operator").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let items: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(items, vec!["actions", "options", "layers", "viewports", "maps"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_administrator_sees_the_full_admin_menu(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_with_role(app, "/api/v1/menus/admin", "administrator").await;

    let json = body_json(response).await;
    let items: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(items, vec!["profile", "settings", "users", "roles", "logout"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unknown_role_still_sees_open_items(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_with_role(app, "/api/v1/menus/admin", "ghost").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let items: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(items, vec!["profile", "settings", "logout"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_missing_role_header_returns_403(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/menus/map").await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unknown_menu_table_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_with_role(app, "/api/v1/menus/bogus", "operator").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_permissions_expand_the_wildcard(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_with_role(app, "/api/v1/permissions", "administrator").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let permissions: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert!(permissions.contains(&"map.import"));
    assert!(permissions.contains(&"admin.roles.manage"));
    assert!(
        !permissions.contains(&"*"),
        "the wildcard expands instead of leaking"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_permissions_for_a_declared_role(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_with_role(app, "/api/v1/permissions", "reader").await;

    let json = body_json(response).await;
    let permissions: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(
        permissions,
        vec![
            "map.layers",
            "map.viewports",
            "map.maps",
            "sidebar.dashboard",
            "sidebar.map"
        ]
    );
}
