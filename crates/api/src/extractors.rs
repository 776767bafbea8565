//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use warbler_common::AppError;
use warbler_db::entities::user;

use crate::middleware::API_KEY_HEADER;

/// Authenticated user extractor.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by auth middleware
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}

/// Raw `api-key` header, for endpoints that resolve the key themselves.
#[derive(Debug, Clone)]
pub struct ApiKey(pub String);

impl<S> FromRequestParts<S> for ApiKey
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| Self(v.to_string()))
            .ok_or_else(|| AppError::Rejected("Missing api-key header".to_string()))
    }
}
