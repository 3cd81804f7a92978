//! Viewport usage history model and DTO. Append-only.

use planview_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `viewport_history` table. Written once, never mutated.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ViewportHistory {
    pub id: DbId,
    pub viewport_id: DbId,
    pub user_id: Option<DbId>,
    pub entered_at: Timestamp,
    pub duration_secs: Option<i32>,
    pub context: Option<serde_json::Value>,
    pub created_at: Timestamp,
}

/// DTO for appending a history entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateViewportHistory {
    pub user_id: Option<DbId>,
    /// Defaults to now.
    pub entered_at: Option<Timestamp>,
    pub duration_secs: Option<i32>,
    pub context: Option<serde_json::Value>,
}
