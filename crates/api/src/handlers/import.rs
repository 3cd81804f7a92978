//! Handlers for blueprint import, conversion re-dispatch, and map deletion.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use planview_core::error::CoreError;
use planview_core::types::DbId;
use planview_db::models::map::Map;
use planview_db::repositories::MapRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::pipeline::{self, BlueprintUpload};
use crate::state::AppState;

/// POST /api/v1/sites/{site_id}/maps/import -- multipart blueprint upload.
///
/// Expects a `blueprint` file part and an optional `name` text part. The
/// route raises the body limit above the intake cap so an oversize upload
/// gets our 400 validation message instead of a bare 413.
pub async fn import(
    State(state): State<AppState>,
    Path(site_id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<Map>)> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut display_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("blueprint") => {
                let filename = field
                    .file_name()
                    .ok_or_else(|| {
                        AppError::Core(CoreError::Validation(
                            "blueprint: file part has no filename".into(),
                        ))
                    })?
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("failed to read upload: {e}")))?;
                upload = Some((filename, bytes.to_vec()));
            }
            Some("name") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("failed to read name: {e}")))?;
                display_name = Some(value);
            }
            _ => {}
        }
    }

    let (filename, bytes) = upload.ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "blueprint: file part is required".into(),
        ))
    })?;

    let map = pipeline::submit_blueprint(
        &state,
        site_id,
        BlueprintUpload {
            filename,
            display_name,
            bytes,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(map)))
}

/// POST /api/v1/maps/{id}/convert -- manual conversion re-dispatch.
pub async fn convert(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Map>> {
    let map = pipeline::redispatch(&state, id).await?;
    Ok(Json(map))
}

/// Confirmation payload for a cascading map deletion.
#[derive(Debug, Serialize)]
pub struct DeleteConfirmation {
    pub message: String,
}

/// DELETE /api/v1/sites/{site_id}/maps/{id} -- cascade delete.
pub async fn delete(
    State(state): State<AppState>,
    Path((site_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DeleteConfirmation>> {
    let map = MapRepo::find_scoped(&state.pool, site_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Map", id }))?;

    MapRepo::cascade_delete(&state.pool, id).await?;
    tracing::info!(map_id = id, "Deleted map and its layers, elements, and viewports");

    Ok(Json(DeleteConfirmation {
        message: format!(
            "Map '{}' and all of its layers, elements, and viewports were deleted",
            map.name
        ),
    }))
}
