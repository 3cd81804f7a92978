//! HTTP-level integration tests for the blueprint import pipeline.
//!
//! The test converter command is `cp`, which behaves like a converter that
//! writes its destination file; `false` stands in for one that crashes.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_blueprint, post_json};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_svg_import_completes_immediately(pool: PgPool) {
    let site_id = common::create_site(&pool, "svg-import").await;

    let app = common::build_test_app(pool.clone());
    let response = post_blueprint(
        app,
        &format!("/api/v1/sites/{site_id}/maps/import"),
        "hall.svg",
        b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>",
        Some("Main Hall"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let map = body_json(response).await;
    assert_eq!(map["name"], "Main Hall");
    assert_eq!(map["conversion_status"], "completed");
    assert_eq!(map["is_active"], true);
    assert!(map["svg_asset_path"]
        .as_str()
        .unwrap()
        .starts_with("maps/uploads/"));

    // The base floor-plan layer is provisioned right away.
    let map_id = map["id"].as_i64().unwrap();
    let app = common::build_test_app(pool);
    let layers = body_json(get(app, &format!("/api/v1/maps/{map_id}/layers")).await).await;
    let layers = layers.as_array().unwrap();
    assert_eq!(layers.len(), 1);
    assert_eq!(layers[0]["key"], "floor-plan");
    assert_eq!(layers[0]["data_source"]["type"], "svg_overlay");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_dxf_import_converts_and_records_mirror_note(pool: PgPool) {
    let site_id = common::create_site(&pool, "dxf-import").await;

    let app = common::build_test_app(pool);
    let response = post_blueprint(
        app,
        &format!("/api/v1/sites/{site_id}/maps/import"),
        "floor.dxf",
        b"0\nSECTION\n",
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let map = body_json(response).await;
    assert_eq!(map["name"], "floor.dxf", "falls back to the file name");
    assert_eq!(map["conversion_status"], "completed");
    assert_eq!(map["is_active"], true);
    assert!(map["svg_asset_path"]
        .as_str()
        .unwrap()
        .starts_with("maps/renders/"));
    assert!(map["conversion_notes"]
        .as_str()
        .unwrap()
        .contains("SVG mirror saved to"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_failed_conversion_lands_on_the_map_not_the_request(pool: PgPool) {
    let site_id = common::create_site(&pool, "dxf-fail").await;

    let mut config = common::test_config();
    config.converter_command = "false".to_string();
    let app = common::build_test_app_with(pool, config);

    let response = post_blueprint(
        app,
        &format!("/api/v1/sites/{site_id}/maps/import"),
        "floor.dxf",
        b"0\nSECTION\n",
        None,
    )
    .await;

    // The import itself succeeds; the failure is recorded on the map.
    assert_eq!(response.status(), StatusCode::CREATED);
    let map = body_json(response).await;
    assert_eq!(map["conversion_status"], "failed");
    assert_eq!(map["is_active"], false);
    assert!(map["conversion_notes"].as_str().unwrap().contains("exit"));
    assert!(
        map["source_dxf_path"].as_str().unwrap().starts_with("maps/uploads/"),
        "the uploaded source stays addressable for retry"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_convert_redispatch_recovers_a_failed_map(pool: PgPool) {
    let site_id = common::create_site(&pool, "redispatch").await;

    // Both app instances share one storage root so the re-dispatch can find
    // the stored source artifact.
    let config = common::test_config();

    // First import with a broken converter.
    let mut broken = config.clone();
    broken.converter_command = "false".to_string();
    let app = common::build_test_app_with(pool.clone(), broken);
    let response = post_blueprint(
        app,
        &format!("/api/v1/sites/{site_id}/maps/import"),
        "floor.dxf",
        b"0\nSECTION\n",
        None,
    )
    .await;
    let map = body_json(response).await;
    let map_id = map["id"].as_i64().unwrap();
    assert_eq!(map["conversion_status"], "failed");

    // Re-dispatch with the working converter.
    let app = common::build_test_app_with(pool, config);
    let response = post_json(app, &format!("/api/v1/maps/{map_id}/convert"), serde_json::json!({}))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let converted = body_json(response).await;
    assert_eq!(converted["conversion_status"], "completed");
    assert_eq!(converted["is_active"], true);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_convert_redispatch_surfaces_a_persistent_failure_as_502(pool: PgPool) {
    let site_id = common::create_site(&pool, "redispatch-fail").await;

    let mut config = common::test_config();
    config.converter_command = "false".to_string();

    let app = common::build_test_app_with(pool.clone(), config.clone());
    let response = post_blueprint(
        app,
        &format!("/api/v1/sites/{site_id}/maps/import"),
        "floor.dxf",
        b"0\nSECTION\n",
        None,
    )
    .await;
    let map_id = body_json(response).await["id"].as_i64().unwrap();

    let app = common::build_test_app_with(pool, config);
    let response = post_json(app, &format!("/api/v1/maps/{map_id}/convert"), serde_json::json!({}))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "CONVERSION_FAILED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_oversize_upload_returns_400_validation(pool: PgPool) {
    let site_id = common::create_site(&pool, "oversize").await;

    let app = common::build_test_app(pool);
    let oversize = vec![0u8; (50 * 1024 * 1024) + 1];
    let response = post_blueprint(
        app,
        &format!("/api/v1/sites/{site_id}/maps/import"),
        "big.dxf",
        &oversize,
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("50 MB"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unknown_extension_returns_400(pool: PgPool) {
    let site_id = common::create_site(&pool, "bad-ext").await;

    let app = common::build_test_app(pool);
    let response = post_blueprint(
        app,
        &format!("/api/v1/sites/{site_id}/maps/import"),
        "plan.pdf",
        b"%PDF-1.4",
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_import_to_missing_site_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_blueprint(
        app,
        "/api/v1/sites/999999/maps/import",
        "plan.svg",
        b"<svg/>",
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_cascade_delete_names_the_map(pool: PgPool) {
    let site_id = common::create_site(&pool, "cascade").await;
    let map_id = common::import_svg_map(&pool, site_id, "Doomed Floor").await;

    let app = common::build_test_app(pool.clone());
    let response = common::delete(app, &format!("/api/v1/sites/{site_id}/maps/{map_id}")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["message"].as_str().unwrap().contains("Doomed Floor"));

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/sites/{site_id}/maps/{map_id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
