//! Map layer entity model and DTOs.
//!
//! Layers support two weak relationship kinds:
//! - `parent_layer_id`: a hierarchy for grouped visibility control, nulled
//!   when the parent is deleted (children are never cascade-deleted)
//! - `related_layers`: cross-references between layers that belong together
//!   (e.g. an icon layer and its label layer); not a foreign key, so entries
//!   may point at layers that no longer exist

use planview_core::composition::LayerRef;
use planview_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A layer row from the `map_layers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MapLayer {
    pub id: DbId,
    pub map_id: DbId,
    pub parent_layer_id: Option<DbId>,
    pub key: String,
    pub display_name: String,
    pub layer_type: String,
    pub element_types: Option<Vec<String>>,
    pub related_layers: Option<Vec<DbId>>,
    pub z_index: i32,
    pub default_visible: bool,
    pub style_preset: Option<serde_json::Value>,
    pub data_source: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MapLayer {
    /// Snapshot for the composition engine.
    pub fn to_ref(&self) -> LayerRef {
        LayerRef {
            id: self.id,
            key: Some(self.key.clone()),
            z_index: self.z_index,
            default_visible: self.default_visible,
            parent_layer_id: self.parent_layer_id,
            related_layers: self.related_layers.clone().unwrap_or_default(),
        }
    }
}

/// DTO for creating a new layer.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLayer {
    pub key: String,
    pub display_name: String,
    pub layer_type: String,
    pub parent_layer_id: Option<DbId>,
    pub element_types: Option<Vec<String>>,
    pub related_layers: Option<Vec<DbId>>,
    /// Defaults to 0.
    pub z_index: Option<i32>,
    /// Defaults to true.
    pub default_visible: Option<bool>,
    pub style_preset: Option<serde_json::Value>,
    pub data_source: Option<serde_json::Value>,
}

/// DTO for partially updating a layer. Only supplied fields change.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLayer {
    pub display_name: Option<String>,
    pub layer_type: Option<String>,
    pub parent_layer_id: Option<DbId>,
    pub element_types: Option<Vec<String>>,
    pub related_layers: Option<Vec<DbId>>,
    pub z_index: Option<i32>,
    pub default_visible: Option<bool>,
    pub style_preset: Option<serde_json::Value>,
    pub data_source: Option<serde_json::Value>,
}
