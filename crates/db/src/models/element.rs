//! Layer element entity model and DTOs.

use planview_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An element row from the `layer_elements` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LayerElement {
    pub id: DbId,
    pub layer_id: DbId,
    pub element_type: String,
    pub geometry: serde_json::Value,
    pub payload: Option<serde_json::Value>,
    pub state: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One element in a batch write. Identity for upsert purposes is the
/// `(element_type, geometry)` pair.
#[derive(Debug, Clone, Deserialize)]
pub struct ElementInput {
    pub element_type: String,
    pub geometry: serde_json::Value,
    pub payload: Option<serde_json::Value>,
    pub state: Option<serde_json::Value>,
}
