//! Repository for the append-only `viewport_history` table.

use planview_core::types::DbId;
use sqlx::PgPool;

use crate::models::viewport_history::{CreateViewportHistory, ViewportHistory};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, viewport_id, user_id, entered_at, duration_secs, context, created_at";

/// Appends and reads viewport usage history. No update or delete: history
/// rows outlive the viewports they describe.
pub struct ViewportHistoryRepo;

impl ViewportHistoryRepo {
    /// Append a history entry. `entered_at` defaults to the insert time.
    pub async fn create(
        pool: &PgPool,
        viewport_id: DbId,
        input: &CreateViewportHistory,
    ) -> Result<ViewportHistory, sqlx::Error> {
        let query = format!(
            "INSERT INTO viewport_history (viewport_id, user_id, entered_at, duration_secs, context)
             VALUES ($1, $2, COALESCE($3, NOW()), $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ViewportHistory>(&query)
            .bind(viewport_id)
            .bind(input.user_id)
            .bind(input.entered_at)
            .bind(input.duration_secs)
            .bind(&input.context)
            .fetch_one(pool)
            .await
    }

    /// List a viewport's history, most recent entries first.
    pub async fn list_by_viewport(
        pool: &PgPool,
        viewport_id: DbId,
        limit: i64,
    ) -> Result<Vec<ViewportHistory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM viewport_history
             WHERE viewport_id = $1
             ORDER BY entered_at DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, ViewportHistory>(&query)
            .bind(viewport_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
