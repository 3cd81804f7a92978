//! Repository for the `maps` table, including the conversion status
//! transitions and the cascading delete contract.

use planview_core::intake::{STATUS_COMPLETED, STATUS_FAILED, STATUS_QUEUED};
use planview_core::types::DbId;
use sqlx::PgPool;

use crate::models::map::{CreateMap, Map, UpdateMap};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, site_id, name, slug, floor_label, sequence, canvas_config, \
     svg_asset_path, source_dxf_path, conversion_status, conversion_notes, is_active, \
     created_at, updated_at";

/// Provides CRUD and conversion-status operations for maps.
pub struct MapRepo;

impl MapRepo {
    /// Insert a new map, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateMap) -> Result<Map, sqlx::Error> {
        let query = format!(
            "INSERT INTO maps (site_id, name, slug, floor_label, sequence, canvas_config,
                 svg_asset_path, source_dxf_path, conversion_status, conversion_notes, is_active)
             VALUES ($1, $2, $3, $4, COALESCE($5, 0), $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Map>(&query)
            .bind(input.site_id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.floor_label)
            .bind(input.sequence)
            .bind(&input.canvas_config)
            .bind(&input.svg_asset_path)
            .bind(&input.source_dxf_path)
            .bind(&input.conversion_status)
            .bind(&input.conversion_notes)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find a map by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Map>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM maps WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Map>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a map scoped to a site. A map id belonging to a different site
    /// resolves to `None` (access-scoped mismatch is a not-found).
    pub async fn find_scoped(
        pool: &PgPool,
        site_id: DbId,
        id: DbId,
    ) -> Result<Option<Map>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM maps
             WHERE id = $1 AND site_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Map>(&query)
            .bind(id)
            .bind(site_id)
            .fetch_optional(pool)
            .await
    }

    /// List a site's maps ordered by sequence, then name.
    pub async fn list_by_site(pool: &PgPool, site_id: DbId) -> Result<Vec<Map>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM maps
             WHERE site_id = $1 AND deleted_at IS NULL
             ORDER BY sequence, name"
        );
        sqlx::query_as::<_, Map>(&query)
            .bind(site_id)
            .fetch_all(pool)
            .await
    }

    /// Update map metadata. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMap,
    ) -> Result<Option<Map>, sqlx::Error> {
        let query = format!(
            "UPDATE maps SET
                name = COALESCE($2, name),
                floor_label = COALESCE($3, floor_label),
                sequence = COALESCE($4, sequence),
                canvas_config = COALESCE($5, canvas_config),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Map>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.floor_label)
            .bind(input.sequence)
            .bind(&input.canvas_config)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Record a successful conversion: asset path, `completed` status, the
    /// optional mirror note, and activation. Single authoritative write
    /// against the latest persisted row.
    pub async fn record_conversion_success(
        pool: &PgPool,
        id: DbId,
        svg_asset_path: &str,
        notes: Option<&str>,
    ) -> Result<Option<Map>, sqlx::Error> {
        let query = format!(
            "UPDATE maps SET
                svg_asset_path = $2,
                conversion_status = $3,
                conversion_notes = $4,
                is_active = TRUE,
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Map>(&query)
            .bind(id)
            .bind(svg_asset_path)
            .bind(STATUS_COMPLETED)
            .bind(notes)
            .fetch_optional(pool)
            .await
    }

    /// Record a failed conversion: `failed` status plus the failure detail.
    /// Leaves the source artifact and prior asset path untouched so the
    /// upload remains addressable for a manual retry.
    pub async fn record_conversion_failure(
        pool: &PgPool,
        id: DbId,
        notes: &str,
    ) -> Result<Option<Map>, sqlx::Error> {
        let query = format!(
            "UPDATE maps SET
                conversion_status = $2,
                conversion_notes = $3,
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Map>(&query)
            .bind(id)
            .bind(STATUS_FAILED)
            .bind(notes)
            .fetch_optional(pool)
            .await
    }

    /// Re-enter the `queued` state for an explicit conversion re-dispatch.
    pub async fn requeue(pool: &PgPool, id: DbId) -> Result<Option<Map>, sqlx::Error> {
        let query = format!(
            "UPDATE maps SET
                conversion_status = $2,
                conversion_notes = NULL,
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Map>(&query)
            .bind(id)
            .bind(STATUS_QUEUED)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a map and everything it owns, as a single transaction:
    /// its layers' elements, then its layers, then its viewports, then the
    /// map itself. An interruption rolls the whole cascade back, so no
    /// orphaned elements can remain.
    pub async fn cascade_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "UPDATE layer_elements SET deleted_at = NOW()
             WHERE deleted_at IS NULL AND layer_id IN
                 (SELECT id FROM map_layers WHERE map_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE map_layers SET deleted_at = NOW()
             WHERE map_id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE map_viewports SET deleted_at = NOW()
             WHERE map_id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let result =
            sqlx::query("UPDATE maps SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(&mut *tx)
                .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
