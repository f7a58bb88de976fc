//! `AuthUser` extractor: the request context left behind by the access gate.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use warden_auth::AuthFailure;
use warden_service::RequestContext;

use crate::error::ApiError;

/// Extracted authenticated user context available in handlers.
///
/// Only present on routes behind the access gate; anywhere else the
/// extractor rejects with 401.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AuthFailure::MissingToken.into())
    }
}
