//! Handlers for the `/sites` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use planview_core::error::CoreError;
use planview_core::types::DbId;
use planview_db::models::site::{CreateSite, Site, UpdateSite};
use planview_db::repositories::SiteRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/sites
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateSite>,
) -> AppResult<(StatusCode, Json<Site>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "name: must not be empty".into(),
        )));
    }
    let site = SiteRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(site)))
}

/// GET /api/v1/sites
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Site>>> {
    let sites = SiteRepo::list(&state.pool).await?;
    Ok(Json(sites))
}

/// GET /api/v1/sites/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Site>> {
    let site = SiteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Site", id }))?;
    Ok(Json(site))
}

/// PUT /api/v1/sites/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSite>,
) -> AppResult<Json<Site>> {
    let site = SiteRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Site", id }))?;
    Ok(Json(site))
}

/// DELETE /api/v1/sites/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = SiteRepo::soft_delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Site", id }))
    }
}
