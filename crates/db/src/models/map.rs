//! Map entity model and DTOs.
//!
//! Conversion status values are the constants in
//! `planview_core::intake` (`queued`, `completed`, `failed`).

use planview_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A map row from the `maps` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Map {
    pub id: DbId,
    pub site_id: DbId,
    pub name: String,
    pub slug: String,
    pub floor_label: Option<String>,
    pub sequence: i32,
    pub canvas_config: Option<serde_json::Value>,
    pub svg_asset_path: String,
    pub source_dxf_path: Option<String>,
    pub conversion_status: String,
    pub conversion_notes: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new map. Used by the import pipeline rather than a
/// public endpoint, so all pipeline-controlled fields are explicit.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMap {
    pub site_id: DbId,
    pub name: String,
    pub slug: String,
    pub floor_label: Option<String>,
    pub sequence: Option<i32>,
    pub canvas_config: Option<serde_json::Value>,
    pub svg_asset_path: String,
    pub source_dxf_path: Option<String>,
    pub conversion_status: String,
    pub conversion_notes: Option<String>,
    pub is_active: bool,
}

/// DTO for updating map metadata. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMap {
    pub name: Option<String>,
    pub floor_label: Option<String>,
    pub sequence: Option<i32>,
    pub canvas_config: Option<serde_json::Value>,
    pub is_active: Option<bool>,
}
