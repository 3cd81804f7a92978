use std::sync::Arc;

use planview_core::permissions::PermissionsConfig;

use crate::config::ServerConfig;
use crate::storage::ArtifactStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: planview_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Immutable role/permission tables, built once at startup.
    pub permissions: Arc<PermissionsConfig>,
    /// Blueprint artifact storage rooted at the configured directory.
    pub store: Arc<ArtifactStore>,
}
