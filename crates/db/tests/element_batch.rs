//! Integration tests for batch element writes: full replacement and
//! merge-by-identity upsert.

use sqlx::PgPool;

use planview_db::models::element::ElementInput;
use planview_db::repositories::{ElementRepo, LayerRepo, MapRepo, SiteRepo};

mod common;
use common::{new_layer, new_map, new_site};

fn element(element_type: &str, x: i64, y: i64) -> ElementInput {
    ElementInput {
        element_type: element_type.to_string(),
        geometry: serde_json::json!({"x": x, "y": y}),
        payload: None,
        state: None,
    }
}

async fn fixture_layer(pool: &PgPool) -> i64 {
    let site = SiteRepo::create(pool, &new_site("Elements", "elements"))
        .await
        .unwrap();
    let map = MapRepo::create(pool, &new_map(site.id, "Floor 1", "floor-1"))
        .await
        .unwrap();
    LayerRepo::create(pool, map.id, &new_layer("machines", "Machines"))
        .await
        .unwrap()
        .id
}

#[sqlx::test(migrations = "./migrations")]
async fn test_replace_all_swaps_element_set(pool: PgPool) {
    let layer_id = fixture_layer(&pool).await;

    ElementRepo::replace_all(&pool, layer_id, &[element("machine", 1, 1), element("machine", 2, 2)])
        .await
        .unwrap();

    let replaced = ElementRepo::replace_all(&pool, layer_id, &[element("machine", 9, 9)])
        .await
        .unwrap();
    assert_eq!(replaced.len(), 1);

    let listed = ElementRepo::list_by_layer(&pool, layer_id).await.unwrap();
    assert_eq!(listed.len(), 1, "old elements must not survive a replace");
    assert_eq!(listed[0].geometry, serde_json::json!({"x": 9, "y": 9}));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_replace_all_with_empty_batch_clears_layer(pool: PgPool) {
    let layer_id = fixture_layer(&pool).await;

    ElementRepo::replace_all(&pool, layer_id, &[element("machine", 1, 1)])
        .await
        .unwrap();
    ElementRepo::replace_all(&pool, layer_id, &[]).await.unwrap();

    let listed = ElementRepo::list_by_layer(&pool, layer_id).await.unwrap();
    assert!(listed.is_empty(), "empty replace should clear the layer");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_upsert_updates_matching_identity_in_place(pool: PgPool) {
    let layer_id = fixture_layer(&pool).await;

    let inserted = ElementRepo::replace_all(&pool, layer_id, &[element("machine", 5, 5)])
        .await
        .unwrap();
    let original_id = inserted[0].id;

    let mut updated = element("machine", 5, 5);
    updated.payload = Some(serde_json::json!({"label": "Press 5"}));
    let merged = ElementRepo::bulk_upsert(&pool, layer_id, &[updated])
        .await
        .unwrap();

    assert_eq!(merged.len(), 1);
    assert_eq!(
        merged[0].id, original_id,
        "matching (element_type, geometry) should update the existing row"
    );
    assert_eq!(
        merged[0].payload,
        Some(serde_json::json!({"label": "Press 5"}))
    );

    let listed = ElementRepo::list_by_layer(&pool, layer_id).await.unwrap();
    assert_eq!(listed.len(), 1, "upsert must not duplicate the element");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_upsert_inserts_new_identity_and_keeps_rest(pool: PgPool) {
    let layer_id = fixture_layer(&pool).await;

    ElementRepo::replace_all(&pool, layer_id, &[element("machine", 1, 1)])
        .await
        .unwrap();

    // Same coordinates but a different type is a different identity.
    ElementRepo::bulk_upsert(&pool, layer_id, &[element("sensor", 1, 1), element("machine", 3, 3)])
        .await
        .unwrap();

    let listed = ElementRepo::list_by_layer(&pool, layer_id).await.unwrap();
    assert_eq!(
        listed.len(),
        3,
        "upsert adds new identities without touching unmatched rows"
    );
}
