//! Site entity model and DTOs.

use planview_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A site row from the `sites` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Site {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub timezone: String,
    pub metadata: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new site.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSite {
    pub name: String,
    pub slug: String,
    /// Defaults to UTC if omitted.
    pub timezone: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// DTO for updating an existing site. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSite {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub timezone: Option<String>,
    pub metadata: Option<serde_json::Value>,
}
