//! Handlers for layer elements: listing and the two batch write modes.

use axum::extract::{Path, State};
use axum::Json;
use planview_core::error::CoreError;
use planview_core::types::DbId;
use planview_db::models::element::{ElementInput, LayerElement};
use planview_db::repositories::{ElementRepo, LayerRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

async fn ensure_layer(state: &AppState, map_id: DbId, layer_id: DbId) -> AppResult<()> {
    LayerRepo::find_scoped(&state.pool, map_id, layer_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Layer",
            id: layer_id,
        }))?;
    Ok(())
}

fn validate_batch(elements: &[ElementInput]) -> AppResult<()> {
    for element in elements {
        if element.element_type.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "element_type: must not be empty".into(),
            )));
        }
    }
    Ok(())
}

/// GET /api/v1/maps/{map_id}/layers/{layer_id}/elements
pub async fn list(
    State(state): State<AppState>,
    Path((map_id, layer_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Vec<LayerElement>>> {
    ensure_layer(&state, map_id, layer_id).await?;
    let elements = ElementRepo::list_by_layer(&state.pool, layer_id).await?;
    Ok(Json(elements))
}

/// PUT /api/v1/maps/{map_id}/layers/{layer_id}/elements -- replace the whole
/// element set atomically. An empty batch clears the layer.
pub async fn replace_all(
    State(state): State<AppState>,
    Path((map_id, layer_id)): Path<(DbId, DbId)>,
    Json(elements): Json<Vec<ElementInput>>,
) -> AppResult<Json<Vec<LayerElement>>> {
    ensure_layer(&state, map_id, layer_id).await?;
    validate_batch(&elements)?;
    let rows = ElementRepo::replace_all(&state.pool, layer_id, &elements).await?;
    Ok(Json(rows))
}

/// POST /api/v1/maps/{map_id}/layers/{layer_id}/elements -- merge a batch by
/// `(element_type, geometry)` identity, leaving unmatched rows alone.
pub async fn bulk_upsert(
    State(state): State<AppState>,
    Path((map_id, layer_id)): Path<(DbId, DbId)>,
    Json(elements): Json<Vec<ElementInput>>,
) -> AppResult<Json<Vec<LayerElement>>> {
    ensure_layer(&state, map_id, layer_id).await?;
    validate_batch(&elements)?;
    let rows = ElementRepo::bulk_upsert(&state.pool, layer_id, &elements).await?;
    Ok(Json(rows))
}
