//! Custom Extractors
//!
//! The platform gateway authenticates requests and forwards the verified
//! tenant and user ids as headers. They are trusted as-is here.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::domain::Caller;
use crate::shared::error::AppError;

pub const TENANT_HEADER: &str = "x-tenant-id";
pub const USER_HEADER: &str = "x-user-id";

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tenant_id = id_header(parts, TENANT_HEADER)?;
        let user_id = id_header(parts, USER_HEADER)?;
        Ok(Caller::new(tenant_id, user_id))
    }
}

fn id_header(parts: &Parts, name: &str) -> Result<i64, AppError> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::Unauthorized(format!("Missing or invalid {} header", name)))
}

/// Parse a path id. Malformed ids are a bad request.
pub fn parse_uuid(value: &str, what: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(value).map_err(|_| AppError::BadRequest(format!("Invalid {} ID", what)))
}
