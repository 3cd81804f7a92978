//! Repository for the `map_layers` table.

use planview_core::types::DbId;
use sqlx::PgPool;

use crate::models::layer::{CreateLayer, MapLayer, UpdateLayer};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, map_id, parent_layer_id, key, display_name, layer_type, \
     element_types, related_layers, z_index, default_visible, style_preset, data_source, \
     created_at, updated_at";

/// Provides CRUD operations for map layers.
pub struct LayerRepo;

impl LayerRepo {
    /// Insert a new layer for a map, returning the created row.
    pub async fn create(
        pool: &PgPool,
        map_id: DbId,
        input: &CreateLayer,
    ) -> Result<MapLayer, sqlx::Error> {
        let query = format!(
            "INSERT INTO map_layers (map_id, parent_layer_id, key, display_name, layer_type,
                 element_types, related_layers, z_index, default_visible, style_preset, data_source)
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, 0), COALESCE($9, TRUE), $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MapLayer>(&query)
            .bind(map_id)
            .bind(input.parent_layer_id)
            .bind(&input.key)
            .bind(&input.display_name)
            .bind(&input.layer_type)
            .bind(&input.element_types)
            .bind(&input.related_layers)
            .bind(input.z_index)
            .bind(input.default_visible)
            .bind(&input.style_preset)
            .bind(&input.data_source)
            .fetch_one(pool)
            .await
    }

    /// Find a layer by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MapLayer>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM map_layers WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, MapLayer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a layer scoped to a map. A layer id belonging to a different map
    /// resolves to `None`.
    pub async fn find_scoped(
        pool: &PgPool,
        map_id: DbId,
        id: DbId,
    ) -> Result<Option<MapLayer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM map_layers
             WHERE id = $1 AND map_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, MapLayer>(&query)
            .bind(id)
            .bind(map_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a map's layer by key (used for idempotent base-layer provisioning).
    pub async fn find_by_key(
        pool: &PgPool,
        map_id: DbId,
        key: &str,
    ) -> Result<Option<MapLayer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM map_layers
             WHERE map_id = $1 AND key = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, MapLayer>(&query)
            .bind(map_id)
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// List a map's layers in render order: z-index ascending with id as the
    /// tie-break, so equal z-indexes keep creation order.
    pub async fn list_by_map(pool: &PgPool, map_id: DbId) -> Result<Vec<MapLayer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM map_layers
             WHERE map_id = $1 AND deleted_at IS NULL
             ORDER BY z_index, id"
        );
        sqlx::query_as::<_, MapLayer>(&query)
            .bind(map_id)
            .fetch_all(pool)
            .await
    }

    /// Partially update a layer. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLayer,
    ) -> Result<Option<MapLayer>, sqlx::Error> {
        let query = format!(
            "UPDATE map_layers SET
                display_name = COALESCE($2, display_name),
                layer_type = COALESCE($3, layer_type),
                parent_layer_id = COALESCE($4, parent_layer_id),
                element_types = COALESCE($5, element_types),
                related_layers = COALESCE($6, related_layers),
                z_index = COALESCE($7, z_index),
                default_visible = COALESCE($8, default_visible),
                style_preset = COALESCE($9, style_preset),
                data_source = COALESCE($10, data_source),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MapLayer>(&query)
            .bind(id)
            .bind(&input.display_name)
            .bind(&input.layer_type)
            .bind(input.parent_layer_id)
            .bind(&input.element_types)
            .bind(&input.related_layers)
            .bind(input.z_index)
            .bind(input.default_visible)
            .bind(&input.style_preset)
            .bind(&input.data_source)
            .fetch_optional(pool)
            .await
    }

    /// Persist a layer's default visibility flag (the layer-level toggle,
    /// distinct from session overrides).
    pub async fn set_default_visible(
        pool: &PgPool,
        id: DbId,
        visible: bool,
    ) -> Result<Option<MapLayer>, sqlx::Error> {
        let query = format!(
            "UPDATE map_layers SET default_visible = $2, updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MapLayer>(&query)
            .bind(id)
            .bind(visible)
            .fetch_optional(pool)
            .await
    }

    /// Point a layer's data source at a new asset.
    pub async fn update_data_source(
        pool: &PgPool,
        id: DbId,
        data_source: &serde_json::Value,
    ) -> Result<Option<MapLayer>, sqlx::Error> {
        let query = format!(
            "UPDATE map_layers SET data_source = $2, updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MapLayer>(&query)
            .bind(id)
            .bind(data_source)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a layer and its elements in one transaction. Child layers
    /// survive; the database nulls their `parent_layer_id`.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "UPDATE layer_elements SET deleted_at = NOW()
             WHERE layer_id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query(
            "UPDATE map_layers SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
