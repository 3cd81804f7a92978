//! Handlers for maps: listing, the render manifest, viewer state, and the
//! composition endpoint.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use planview_core::composition::{self, LayerRef, ViewerState, ViewportRef};
use planview_core::error::CoreError;
use planview_core::types::DbId;
use planview_db::models::element::LayerElement;
use planview_db::models::layer::MapLayer;
use planview_db::models::map::{Map, UpdateMap};
use planview_db::models::viewport::MapViewport;
use planview_db::repositories::{ElementRepo, LayerRepo, MapRepo, ViewportRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// A layer with its elements embedded, as the viewer renders it.
#[derive(Debug, Serialize)]
pub struct LayerWithElements {
    #[serde(flatten)]
    pub layer: MapLayer,
    pub elements: Vec<LayerElement>,
}

/// Everything a client needs to render a map.
#[derive(Debug, Serialize)]
pub struct MapManifest {
    pub map: Map,
    pub layers: Vec<LayerWithElements>,
    pub viewports: Vec<MapViewport>,
    pub root_viewport_id: Option<DbId>,
}

/// Load the full manifest for a map that is known to exist.
async fn load_manifest(state: &AppState, map: Map) -> AppResult<MapManifest> {
    let layers = LayerRepo::list_by_map(&state.pool, map.id).await?;
    let mut with_elements = Vec::with_capacity(layers.len());
    for layer in layers {
        let elements = ElementRepo::list_by_layer(&state.pool, layer.id).await?;
        with_elements.push(LayerWithElements { layer, elements });
    }

    let viewports = ViewportRepo::list_by_map(&state.pool, map.id).await?;
    let root_viewport_id = viewports.iter().find(|v| v.is_root).map(|v| v.id);

    Ok(MapManifest {
        map,
        layers: with_elements,
        viewports,
        root_viewport_id,
    })
}

async fn find_map(state: &AppState, id: DbId) -> AppResult<Map> {
    MapRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Map", id }))
}

/// GET /api/v1/sites/{site_id}/maps
pub async fn list_by_site(
    State(state): State<AppState>,
    Path(site_id): Path<DbId>,
) -> AppResult<Json<Vec<Map>>> {
    let maps = MapRepo::list_by_site(&state.pool, site_id).await?;
    Ok(Json(maps))
}

/// GET /api/v1/sites/{site_id}/maps/{id} -- the render manifest.
///
/// A map id under the wrong site is a 404, never a leak of another site's map.
pub async fn get_manifest(
    State(state): State<AppState>,
    Path((site_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<MapManifest>> {
    let map = MapRepo::find_scoped(&state.pool, site_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Map", id }))?;
    let manifest = load_manifest(&state, map).await?;
    Ok(Json(manifest))
}

/// PUT /api/v1/sites/{site_id}/maps/{id}
pub async fn update(
    State(state): State<AppState>,
    Path((site_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateMap>,
) -> AppResult<Json<Map>> {
    MapRepo::find_scoped(&state.pool, site_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Map", id }))?;
    let map = MapRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Map", id }))?;
    Ok(Json(map))
}

#[derive(Debug, Deserialize)]
pub struct StateParams {
    pub viewport_id: Option<DbId>,
}

/// Manifest plus the derived session state.
#[derive(Debug, Serialize)]
pub struct MapStateResponse {
    #[serde(flatten)]
    pub manifest: MapManifest,
    pub viewer: ViewerState,
}

/// GET /api/v1/maps/{id}/state -- manifest plus initial viewer state.
///
/// With `?viewport_id=` the state is derived for that viewport; otherwise it
/// starts on the root viewport (or the first one).
pub async fn get_state(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<StateParams>,
) -> AppResult<Json<MapStateResponse>> {
    let map = find_map(&state, id).await?;
    let manifest = load_manifest(&state, map).await?;

    let viewport_refs: Vec<ViewportRef> = manifest.viewports.iter().map(|v| v.to_ref()).collect();
    let mut viewer = ViewerState::for_map(&viewport_refs, manifest.root_viewport_id);

    if let Some(viewport_id) = params.viewport_id {
        if !manifest.viewports.iter().any(|v| v.id == viewport_id) {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Viewport",
                id: viewport_id,
            }));
        }
        viewer.set_active_viewport(&viewport_refs, viewport_id);
    }

    Ok(Json(MapStateResponse { manifest, viewer }))
}

#[derive(Debug, Deserialize)]
pub struct VisibleLayersRequest {
    /// Viewport to compose against; omitted means defaults only.
    pub viewport_id: Option<DbId>,
    /// Session-level overrides keyed by layer key.
    #[serde(default)]
    pub overrides: HashMap<String, bool>,
}

#[derive(Debug, Serialize)]
pub struct VisibleLayersResponse {
    pub viewport_id: Option<DbId>,
    /// Resolved visibility for every layer key.
    pub visibility: HashMap<String, bool>,
    /// The visible layers in render order (z-index ascending).
    pub layers: Vec<MapLayer>,
}

/// POST /api/v1/maps/{id}/visible-layers -- run the composition engine.
pub async fn visible_layers(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(request): Json<VisibleLayersRequest>,
) -> AppResult<Json<VisibleLayersResponse>> {
    find_map(&state, id).await?;

    let layers = LayerRepo::list_by_map(&state.pool, id).await?;
    let layer_refs: Vec<LayerRef> = layers.iter().map(|l| l.to_ref()).collect();

    let viewport_ref = match request.viewport_id {
        None => None,
        Some(viewport_id) => {
            let viewport = ViewportRepo::find_scoped(&state.pool, id, viewport_id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "Viewport",
                    id: viewport_id,
                }))?;
            Some(viewport.to_ref())
        }
    };

    let visibility =
        composition::resolve_visibility(&layer_refs, viewport_ref.as_ref(), &request.overrides);
    let ordered = composition::render_list(&layer_refs, &visibility);

    // Map the ordered refs back onto the full rows.
    let layers_by_id: HashMap<DbId, &MapLayer> = layers.iter().map(|l| (l.id, l)).collect();
    let visible: Vec<MapLayer> = ordered
        .iter()
        .filter_map(|r| layers_by_id.get(&r.id).map(|l| (*l).clone()))
        .collect();

    Ok(Json(VisibleLayersResponse {
        viewport_id: request.viewport_id,
        visibility,
        layers: visible,
    }))
}
