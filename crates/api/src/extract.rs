//! Request extractors.
//!
//! Authentication itself is handled by an upstream gateway; the caller's
//! resolved role arrives on the `x-user-role` header. [`CallerRole`] is the
//! extractor for that contract.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use planview_core::error::CoreError;

use crate::error::AppError;

/// Header carrying the authenticated caller's role.
pub const ROLE_HEADER: &str = "x-user-role";

/// The authenticated caller's role name.
#[derive(Debug, Clone)]
pub struct CallerRole(pub String);

impl<S> FromRequestParts<S> for CallerRole
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let role = parts
            .headers
            .get(ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|role| !role.is_empty())
            .ok_or_else(|| {
                AppError::Core(CoreError::Forbidden(
                    "no authenticated role on the request".into(),
                ))
            })?;
        Ok(CallerRole(role.to_string()))
    }
}
