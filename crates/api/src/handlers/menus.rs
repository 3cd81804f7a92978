//! Handlers for the capability gate: menu filtering and permission lookup.

use axum::extract::{Path, State};
use axum::Json;
use planview_core::error::CoreError;
use planview_core::permissions::MenuTable;

use crate::error::{AppError, AppResult};
use crate::extract::CallerRole;
use crate::response::DataResponse;
use crate::state::AppState;

fn parse_table(name: &str) -> AppResult<MenuTable> {
    match name {
        "map" => Ok(MenuTable::Map),
        "sidebar" => Ok(MenuTable::Sidebar),
        "admin" => Ok(MenuTable::Admin),
        other => Err(AppError::Core(CoreError::Validation(format!(
            "menu: unknown table '{other}' (expected map, sidebar, or admin)"
        )))),
    }
}

/// GET /api/v1/menus/{table} -- the menu keys the caller's role may see, in
/// declared order.
pub async fn allowed_items(
    State(state): State<AppState>,
    CallerRole(role): CallerRole,
    Path(table): Path<String>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let table = parse_table(&table)?;
    let items = state.permissions.allowed_menu_items(&role, table);
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/permissions -- the caller's effective permission set.
pub async fn permissions(
    State(state): State<AppState>,
    CallerRole(role): CallerRole,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let permissions = state.permissions.permissions_for(&role);
    Ok(Json(DataResponse { data: permissions }))
}
