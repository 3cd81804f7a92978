//! Repository for the `map_viewports` table.

use planview_core::types::DbId;
use sqlx::PgPool;

use crate::models::viewport::{CreateViewport, MapViewport, UpdateViewport};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, map_id, name, slug, is_root, bounds, default_zoom, default_pan, \
     layer_overrides, refresh_interval, notes, created_at, updated_at";

/// Provides CRUD operations for viewports.
pub struct ViewportRepo;

impl ViewportRepo {
    /// Insert a new viewport for a map, returning the created row.
    pub async fn create(
        pool: &PgPool,
        map_id: DbId,
        input: &CreateViewport,
    ) -> Result<MapViewport, sqlx::Error> {
        let query = format!(
            "INSERT INTO map_viewports (map_id, name, slug, is_root, bounds, default_zoom,
                 default_pan, layer_overrides, refresh_interval, notes)
             VALUES ($1, $2, $3, COALESCE($4, FALSE), $5, COALESCE($6, 1.0), $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MapViewport>(&query)
            .bind(map_id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(input.is_root)
            .bind(&input.bounds)
            .bind(input.default_zoom)
            .bind(&input.default_pan)
            .bind(&input.layer_overrides)
            .bind(input.refresh_interval)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a viewport by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MapViewport>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM map_viewports WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, MapViewport>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a viewport scoped to a map. A viewport id belonging to a
    /// different map resolves to `None`.
    pub async fn find_scoped(
        pool: &PgPool,
        map_id: DbId,
        id: DbId,
    ) -> Result<Option<MapViewport>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM map_viewports
             WHERE id = $1 AND map_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, MapViewport>(&query)
            .bind(id)
            .bind(map_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a map's root viewport, if one has been designated.
    pub async fn find_root(pool: &PgPool, map_id: DbId) -> Result<Option<MapViewport>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM map_viewports
             WHERE map_id = $1 AND is_root AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, MapViewport>(&query)
            .bind(map_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether another live viewport on this map already claims root. Pass
    /// `exclude` when updating an existing viewport so it does not collide
    /// with itself.
    pub async fn root_exists(
        pool: &PgPool,
        map_id: DbId,
        exclude: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                 SELECT 1 FROM map_viewports
                 WHERE map_id = $1 AND is_root AND deleted_at IS NULL
                     AND ($2::BIGINT IS NULL OR id <> $2)
             )",
        )
        .bind(map_id)
        .bind(exclude)
        .fetch_one(pool)
        .await?;
        Ok(exists.0)
    }

    /// List a map's viewports with the root first, then by name.
    pub async fn list_by_map(
        pool: &PgPool,
        map_id: DbId,
    ) -> Result<Vec<MapViewport>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM map_viewports
             WHERE map_id = $1 AND deleted_at IS NULL
             ORDER BY is_root DESC, name"
        );
        sqlx::query_as::<_, MapViewport>(&query)
            .bind(map_id)
            .fetch_all(pool)
            .await
    }

    /// Partially update a viewport. Only non-`None` fields in `input` are
    /// applied. The root flag is immutable after creation; re-rooting a map
    /// is delete-and-recreate.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateViewport,
    ) -> Result<Option<MapViewport>, sqlx::Error> {
        let query = format!(
            "UPDATE map_viewports SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                bounds = COALESCE($4, bounds),
                default_zoom = COALESCE($5, default_zoom),
                default_pan = COALESCE($6, default_pan),
                layer_overrides = COALESCE($7, layer_overrides),
                refresh_interval = COALESCE($8, refresh_interval),
                notes = COALESCE($9, notes),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MapViewport>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.bounds)
            .bind(input.default_zoom)
            .bind(&input.default_pan)
            .bind(&input.layer_overrides)
            .bind(input.refresh_interval)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a viewport by ID. Returns `true` if a row was marked
    /// deleted. History rows are retained.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE map_viewports SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
