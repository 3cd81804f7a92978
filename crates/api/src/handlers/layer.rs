//! Handlers for map layers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use planview_core::error::CoreError;
use planview_core::types::DbId;
use planview_db::models::layer::{CreateLayer, MapLayer, UpdateLayer};
use planview_db::repositories::{LayerRepo, MapRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

async fn ensure_map(state: &AppState, map_id: DbId) -> AppResult<()> {
    MapRepo::find_by_id(&state.pool, map_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Map",
            id: map_id,
        }))?;
    Ok(())
}

async fn find_scoped(state: &AppState, map_id: DbId, id: DbId) -> AppResult<MapLayer> {
    LayerRepo::find_scoped(&state.pool, map_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Layer",
            id,
        }))
}

/// POST /api/v1/maps/{map_id}/layers
pub async fn create(
    State(state): State<AppState>,
    Path(map_id): Path<DbId>,
    Json(input): Json<CreateLayer>,
) -> AppResult<(StatusCode, Json<MapLayer>)> {
    ensure_map(&state, map_id).await?;
    if input.key.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "key: must not be empty".into(),
        )));
    }
    // A declared parent must be a layer of the same map.
    if let Some(parent_id) = input.parent_layer_id {
        if LayerRepo::find_scoped(&state.pool, map_id, parent_id)
            .await?
            .is_none()
        {
            return Err(AppError::Core(CoreError::Validation(
                "parent_layer_id: no such layer on this map".into(),
            )));
        }
    }
    let layer = LayerRepo::create(&state.pool, map_id, &input).await?;
    Ok((StatusCode::CREATED, Json(layer)))
}

/// GET /api/v1/maps/{map_id}/layers -- render order (z-index ascending).
pub async fn list(
    State(state): State<AppState>,
    Path(map_id): Path<DbId>,
) -> AppResult<Json<Vec<MapLayer>>> {
    ensure_map(&state, map_id).await?;
    let layers = LayerRepo::list_by_map(&state.pool, map_id).await?;
    Ok(Json(layers))
}

/// GET /api/v1/maps/{map_id}/layers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((map_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<MapLayer>> {
    let layer = find_scoped(&state, map_id, id).await?;
    Ok(Json(layer))
}

/// PUT /api/v1/maps/{map_id}/layers/{id}
pub async fn update(
    State(state): State<AppState>,
    Path((map_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateLayer>,
) -> AppResult<Json<MapLayer>> {
    find_scoped(&state, map_id, id).await?;
    if let Some(parent_id) = input.parent_layer_id {
        if parent_id == id {
            return Err(AppError::Core(CoreError::Validation(
                "parent_layer_id: a layer cannot be its own parent".into(),
            )));
        }
        if LayerRepo::find_scoped(&state.pool, map_id, parent_id)
            .await?
            .is_none()
        {
            return Err(AppError::Core(CoreError::Validation(
                "parent_layer_id: no such layer on this map".into(),
            )));
        }
    }
    let layer = LayerRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Layer",
            id,
        }))?;
    Ok(Json(layer))
}

/// POST /api/v1/maps/{map_id}/layers/{id}/toggle -- flip and persist the
/// layer's default visibility (distinct from session overrides).
pub async fn toggle_visibility(
    State(state): State<AppState>,
    Path((map_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<MapLayer>> {
    let layer = find_scoped(&state, map_id, id).await?;
    let toggled = LayerRepo::set_default_visible(&state.pool, id, !layer.default_visible)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Layer",
            id,
        }))?;
    Ok(Json(toggled))
}

/// DELETE /api/v1/maps/{map_id}/layers/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path((map_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    find_scoped(&state, map_id, id).await?;
    LayerRepo::soft_delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
