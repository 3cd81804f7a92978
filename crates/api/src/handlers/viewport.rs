//! Handlers for viewports and their usage history.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use planview_core::error::CoreError;
use planview_core::types::DbId;
use planview_db::models::viewport::{CreateViewport, MapViewport, UpdateViewport};
use planview_db::models::viewport_history::{CreateViewportHistory, ViewportHistory};
use planview_db::repositories::{MapRepo, ViewportHistoryRepo, ViewportRepo};
use serde::Deserialize;

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

async fn find_scoped(state: &AppState, map_id: DbId, id: DbId) -> AppResult<MapViewport> {
    ViewportRepo::find_scoped(&state.pool, map_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Viewport",
            id,
        }))
}

/// POST /api/v1/maps/{map_id}/viewports
///
/// At most one root viewport per map, enforced here at write time.
pub async fn create(
    State(state): State<AppState>,
    Path(map_id): Path<DbId>,
    Json(input): Json<CreateViewport>,
) -> AppResult<(StatusCode, Json<MapViewport>)> {
    ensure_map(&state, map_id).await?;
    if let Some(zoom) = input.default_zoom {
        if zoom <= 0.0 {
            return Err(AppError::Core(CoreError::Validation(
                "default_zoom: must be positive".into(),
            )));
        }
    }
    if input.is_root == Some(true)
        && ViewportRepo::root_exists(&state.pool, map_id, None).await?
    {
        return Err(AppError::Core(CoreError::Conflict(
            "this map already has a root viewport".into(),
        )));
    }
    let viewport = ViewportRepo::create(&state.pool, map_id, &input).await?;
    Ok((StatusCode::CREATED, Json(viewport)))
}

/// GET /api/v1/maps/{map_id}/viewports -- root first, then by name.
pub async fn list(
    State(state): State<AppState>,
    Path(map_id): Path<DbId>,
) -> AppResult<Json<Vec<MapViewport>>> {
    ensure_map(&state, map_id).await?;
    let viewports = ViewportRepo::list_by_map(&state.pool, map_id).await?;
    Ok(Json(viewports))
}

/// GET /api/v1/maps/{map_id}/viewports/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((map_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<MapViewport>> {
    let viewport = find_scoped(&state, map_id, id).await?;
    Ok(Json(viewport))
}

/// PUT /api/v1/maps/{map_id}/viewports/{id}
pub async fn update(
    State(state): State<AppState>,
    Path((map_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateViewport>,
) -> AppResult<Json<MapViewport>> {
    find_scoped(&state, map_id, id).await?;
    if let Some(zoom) = input.default_zoom {
        if zoom <= 0.0 {
            return Err(AppError::Core(CoreError::Validation(
                "default_zoom: must be positive".into(),
            )));
        }
    }
    let viewport = ViewportRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Viewport",
            id,
        }))?;
    Ok(Json(viewport))
}

/// DELETE /api/v1/maps/{map_id}/viewports/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path((map_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    find_scoped(&state, map_id, id).await?;
    ViewportRepo::soft_delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/maps/{map_id}/viewports/{id}/history -- append a usage entry.
pub async fn record_history(
    State(state): State<AppState>,
    Path((map_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<CreateViewportHistory>,
) -> AppResult<(StatusCode, Json<ViewportHistory>)> {
    find_scoped(&state, map_id, id).await?;
    let entry = ViewportHistoryRepo::create(&state.pool, id, &input).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<i64>,
}

/// GET /api/v1/maps/{map_id}/viewports/{id}/history -- most recent first.
pub async fn list_history(
    State(state): State<AppState>,
    Path((map_id, id)): Path<(DbId, DbId)>,
    Query(params): Query<HistoryParams>,
) -> AppResult<Json<Vec<ViewportHistory>>> {
    find_scoped(&state, map_id, id).await?;
    let limit = params.limit.unwrap_or(100).clamp(1, 1000);
    let entries = ViewportHistoryRepo::list_by_viewport(&state.pool, id, limit).await?;
    Ok(Json(entries))
}
