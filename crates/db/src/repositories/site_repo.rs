//! Repository for the `sites` table.

use planview_core::types::DbId;
use sqlx::PgPool;

use crate::models::site::{CreateSite, Site, UpdateSite};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, slug, timezone, metadata, created_at, updated_at";

/// Provides CRUD operations for sites.
pub struct SiteRepo;

impl SiteRepo {
    /// Insert a new site, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSite) -> Result<Site, sqlx::Error> {
        let query = format!(
            "INSERT INTO sites (name, slug, timezone, metadata)
             VALUES ($1, $2, COALESCE($3, 'UTC'), $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Site>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.timezone)
            .bind(&input.metadata)
            .fetch_one(pool)
            .await
    }

    /// Find a site by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Site>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sites WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Site>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all sites ordered by name. Excludes soft-deleted rows.
    pub async fn list(pool: &PgPool) -> Result<Vec<Site>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sites WHERE deleted_at IS NULL ORDER BY name");
        sqlx::query_as::<_, Site>(&query).fetch_all(pool).await
    }

    /// Update a site. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSite,
    ) -> Result<Option<Site>, sqlx::Error> {
        let query = format!(
            "UPDATE sites SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                timezone = COALESCE($4, timezone),
                metadata = COALESCE($5, metadata),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Site>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.timezone)
            .bind(&input.metadata)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a site by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE sites SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
