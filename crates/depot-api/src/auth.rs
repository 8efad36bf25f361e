//! Request identity extraction.
//!
//! The gateway in front of this service authenticates the session and
//! forwards the caller's identity in headers; handlers take an
//! `OwnerContext` argument to require it.

use axum::{extract::FromRequestParts, http::request::Parts};
use depot_core::AppError;
use uuid::Uuid;

use crate::error::HttpAppError;

/// Identity of the caller, taken from `x-owner-id` and `x-account-id`.
#[derive(Debug, Clone, Copy)]
pub struct OwnerContext {
    pub owner: Uuid,
    pub account_id: Uuid,
}

fn header_uuid(parts: &Parts, name: &str) -> Result<Uuid, AppError> {
    let raw = parts
        .headers
        .get(name)
        .ok_or_else(|| AppError::Unauthorized(format!("Missing {} header", name)))?
        .to_str()
        .map_err(|_| AppError::Unauthorized(format!("Invalid {} header", name)))?;

    raw.parse()
        .map_err(|_| AppError::Unauthorized(format!("Invalid {} header", name)))
}

impl<S> FromRequestParts<S> for OwnerContext
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let owner = header_uuid(parts, "x-owner-id")?;
        let account_id = header_uuid(parts, "x-account-id")?;
        Ok(OwnerContext { owner, account_id })
    }
}
