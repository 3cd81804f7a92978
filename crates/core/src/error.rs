//! Domain-level error taxonomy shared by all crates.

use crate::types::DbId;

/// Domain error type. The API crate maps each variant onto an HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Entity absent, or present but scoped to a different parent.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Bad or missing input. Field-scoped message where possible.
    #[error("{0}")]
    Validation(String),

    /// Uniqueness or state violation (duplicate slug/key, second root viewport).
    #[error("{0}")]
    Conflict(String),

    /// Caller's role does not grant the required permission.
    #[error("{0}")]
    Forbidden(String),

    /// An artifact could not be written or read.
    #[error("{0}")]
    Storage(String),

    /// The external converter failed or timed out.
    #[error("{0}")]
    Conversion(String),

    /// Unexpected internal failure.
    #[error("{0}")]
    Internal(String),
}
