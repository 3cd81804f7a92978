//! Layer/viewport visibility composition engine.
//!
//! Pure functions over lightweight layer/viewport snapshots plus a
//! session-local [`ViewerState`]. Visibility for a layer is resolved from
//! three sources, later ones winning:
//!
//! 1. the layer's `default_visible` flag
//! 2. the active viewport's `layer_overrides`
//! 3. the session's transient user overrides
//!
//! The render list is the layers sorted ascending by z-index (stable, so
//! equal z-indexes keep creation order) and filtered to the visible ones.
//!
//! Parent/child and related-layer references are adjacency lookups only.
//! Related ids may dangle (they are not foreign keys) and may form cycles,
//! so traversal never recurses through ownership; cascades are explicit
//! opt-in operations on the session state, never part of resolution.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Minimum session zoom factor.
pub const MIN_ZOOM: f64 = 0.2;

/// Maximum session zoom factor.
pub const MAX_ZOOM: f64 = 5.0;

// ── Input snapshots ──────────────────────────────────────────────────

/// The slice of a map layer the engine needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerRef {
    pub id: DbId,
    /// Stable key; synthesized as `layer-<id>` when absent.
    pub key: Option<String>,
    pub z_index: i32,
    pub default_visible: bool,
    pub parent_layer_id: Option<DbId>,
    /// Weak cross-references; entries may point at deleted layers.
    #[serde(default)]
    pub related_layers: Vec<DbId>,
}

/// The slice of a viewport the engine needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportRef {
    pub id: DbId,
    /// Per-viewport visibility overrides keyed by layer key.
    #[serde(default)]
    pub layer_overrides: HashMap<String, bool>,
    pub default_zoom: Option<f64>,
    pub default_pan: Option<serde_json::Value>,
}

// ── Key resolution ───────────────────────────────────────────────────

/// A layer's identity key for visibility maps.
pub fn layer_key(layer: &LayerRef) -> String {
    match &layer.key {
        Some(key) if !key.is_empty() => key.clone(),
        _ => format!("layer-{}", layer.id),
    }
}

// ── Resolution steps ─────────────────────────────────────────────────

/// Resolve every layer's visibility from defaults, viewport overrides, and
/// user overrides, in that order of precedence.
pub fn resolve_visibility(
    layers: &[LayerRef],
    viewport: Option<&ViewportRef>,
    user_overrides: &HashMap<String, bool>,
) -> HashMap<String, bool> {
    let mut visibility: HashMap<String, bool> = layers
        .iter()
        .map(|layer| (layer_key(layer), layer.default_visible))
        .collect();

    if let Some(viewport) = viewport {
        for (key, value) in &viewport.layer_overrides {
            visibility.insert(key.clone(), *value);
        }
    }

    for (key, value) in user_overrides {
        visibility.insert(key.clone(), *value);
    }

    visibility
}

/// Produce the render-ordered list: stable sort by z-index ascending, then
/// filter to layers whose resolved visibility is true.
///
/// `layers` must be in creation order; equal z-indexes keep that order.
pub fn render_list<'a>(
    layers: &'a [LayerRef],
    visibility: &HashMap<String, bool>,
) -> Vec<&'a LayerRef> {
    let mut ordered: Vec<&LayerRef> = layers.iter().collect();
    ordered.sort_by_key(|layer| layer.z_index);
    ordered
        .into_iter()
        .filter(|layer| {
            visibility
                .get(&layer_key(layer))
                .copied()
                .unwrap_or(layer.default_visible)
        })
        .collect()
}

// ── Topology lookups ─────────────────────────────────────────────────

/// Direct children of a layer (layers whose `parent_layer_id` points at it).
pub fn children_of(layers: &[LayerRef], parent_id: DbId) -> Vec<&LayerRef> {
    layers
        .iter()
        .filter(|layer| layer.parent_layer_id == Some(parent_id))
        .collect()
}

/// Layers referenced by `layer.related_layers`. Dangling ids are skipped.
pub fn related_of<'a>(layers: &'a [LayerRef], layer: &LayerRef) -> Vec<&'a LayerRef> {
    layer
        .related_layers
        .iter()
        .filter_map(|id| layers.iter().find(|candidate| candidate.id == *id))
        .collect()
}

/// All transitive children of a layer, breadth-first. Cycle-safe: each layer
/// is visited at most once.
pub fn descendants_of(layers: &[LayerRef], root_id: DbId) -> Vec<&LayerRef> {
    let mut seen: HashSet<DbId> = HashSet::from([root_id]);
    let mut queue: VecDeque<DbId> = VecDeque::from([root_id]);
    let mut result = Vec::new();

    while let Some(current) = queue.pop_front() {
        for child in children_of(layers, current) {
            if seen.insert(child.id) {
                result.push(child);
                queue.push_back(child.id);
            }
        }
    }

    result
}

// ── Session state ────────────────────────────────────────────────────

/// Clamp a zoom factor to the allowed range.
pub fn clamp_zoom(zoom: f64) -> f64 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Per-session viewer state: the active viewport, transient layer
/// overrides, and the current camera. Session-local only; nothing here is
/// persisted back to the viewport's own `layer_overrides`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerState {
    pub active_viewport_id: Option<DbId>,
    pub user_overrides: HashMap<String, bool>,
    pub zoom: f64,
    pub pan: serde_json::Value,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            active_viewport_id: None,
            user_overrides: HashMap::new(),
            zoom: 1.0,
            pan: serde_json::json!({ "x": 0, "y": 0 }),
        }
    }
}

impl ViewerState {
    /// Initial state for a freshly loaded map: the root viewport if one
    /// exists, else the first viewport, else no viewport.
    pub fn for_map(viewports: &[ViewportRef], root_viewport_id: Option<DbId>) -> Self {
        let mut state = Self::default();
        let initial = root_viewport_id.or_else(|| viewports.first().map(|v| v.id));
        if let Some(id) = initial {
            state.apply_viewport_defaults(viewports, id);
        }
        state
    }

    fn active_viewport<'a>(&self, viewports: &'a [ViewportRef]) -> Option<&'a ViewportRef> {
        let id = self.active_viewport_id?;
        viewports.iter().find(|viewport| viewport.id == id)
    }

    fn apply_viewport_defaults(&mut self, viewports: &[ViewportRef], viewport_id: DbId) {
        self.active_viewport_id = Some(viewport_id);
        if let Some(viewport) = viewports.iter().find(|v| v.id == viewport_id) {
            if let Some(zoom) = viewport.default_zoom {
                self.zoom = clamp_zoom(zoom);
            }
            if let Some(pan) = &viewport.default_pan {
                self.pan = pan.clone();
            }
        }
    }

    /// Switch the active viewport. Clears every transient user override and
    /// re-derives zoom/pan from the new viewport's defaults, keeping the
    /// previous camera where the viewport defines none.
    pub fn set_active_viewport(&mut self, viewports: &[ViewportRef], viewport_id: DbId) {
        if self.active_viewport_id == Some(viewport_id) {
            return;
        }
        self.user_overrides.clear();
        self.apply_viewport_defaults(viewports, viewport_id);
    }

    /// Resolved visibility for every layer under the current session.
    pub fn resolved_visibility(
        &self,
        layers: &[LayerRef],
        viewports: &[ViewportRef],
    ) -> HashMap<String, bool> {
        resolve_visibility(
            layers,
            self.active_viewport(viewports),
            &self.user_overrides,
        )
    }

    /// The ordered, filtered render list under the current session.
    pub fn visible_layers<'a>(
        &self,
        layers: &'a [LayerRef],
        viewports: &[ViewportRef],
    ) -> Vec<&'a LayerRef> {
        let visibility = self.resolved_visibility(layers, viewports);
        render_list(layers, &visibility)
    }

    /// Flip one layer's visibility in the session. Touches only that key.
    pub fn toggle_layer(&mut self, layers: &[LayerRef], viewports: &[ViewportRef], key: &str) {
        let resolved = self.resolved_visibility(layers, viewports);
        let current = resolved.get(key).copied().unwrap_or(true);
        self.user_overrides.insert(key.to_string(), !current);
    }

    /// Opt-in cascade: set a layer and all its transitive children to the
    /// given visibility in the session overrides.
    pub fn override_with_descendants(
        &mut self,
        layers: &[LayerRef],
        layer_id: DbId,
        visible: bool,
    ) {
        if let Some(layer) = layers.iter().find(|l| l.id == layer_id) {
            self.user_overrides.insert(layer_key(layer), visible);
        }
        for child in descendants_of(layers, layer_id) {
            self.user_overrides.insert(layer_key(child), visible);
        }
    }

    /// Opt-in cascade: set a layer and its related layers to the given
    /// visibility. Dangling related ids are ignored.
    pub fn override_with_related(&mut self, layers: &[LayerRef], layer_id: DbId, visible: bool) {
        let Some(layer) = layers.iter().find(|l| l.id == layer_id) else {
            return;
        };
        self.user_overrides.insert(layer_key(layer), visible);
        for related in related_of(layers, layer) {
            self.user_overrides.insert(layer_key(related), visible);
        }
    }

    /// Set the session zoom, clamped to the allowed range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = clamp_zoom(zoom);
    }
}

// ── Tests ────────────────────────────────────────────────────────────
