//! Map viewport entity model and DTOs.

use std::collections::HashMap;

use planview_core::composition::ViewportRef;
use planview_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A viewport row from the `map_viewports` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MapViewport {
    pub id: DbId,
    pub map_id: DbId,
    pub name: String,
    pub slug: String,
    pub is_root: bool,
    pub bounds: serde_json::Value,
    pub default_zoom: f64,
    pub default_pan: Option<serde_json::Value>,
    pub layer_overrides: Option<serde_json::Value>,
    pub refresh_interval: Option<i32>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MapViewport {
    /// Snapshot for the composition engine. A malformed `layer_overrides`
    /// blob degrades to no overrides rather than failing the render.
    pub fn to_ref(&self) -> ViewportRef {
        let layer_overrides: HashMap<String, bool> = self
            .layer_overrides
            .clone()
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default();
        ViewportRef {
            id: self.id,
            layer_overrides,
            default_zoom: Some(self.default_zoom),
            default_pan: self.default_pan.clone(),
        }
    }
}

/// DTO for creating a new viewport.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateViewport {
    pub name: String,
    pub slug: String,
    /// Defaults to false. At most one root viewport per map.
    pub is_root: Option<bool>,
    pub bounds: serde_json::Value,
    /// Defaults to 1.0. Must be positive.
    pub default_zoom: Option<f64>,
    pub default_pan: Option<serde_json::Value>,
    pub layer_overrides: Option<serde_json::Value>,
    pub refresh_interval: Option<i32>,
    pub notes: Option<String>,
}

/// DTO for partially updating a viewport. Only supplied fields change.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateViewport {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub bounds: Option<serde_json::Value>,
    pub default_zoom: Option<f64>,
    pub default_pan: Option<serde_json::Value>,
    pub layer_overrides: Option<serde_json::Value>,
    pub refresh_interval: Option<i32>,
    pub notes: Option<String>,
}
