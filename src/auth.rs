pub mod blacklist;
pub mod credentials;
pub mod jwt;
pub mod tokens;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{errors::AppError, models::jwt::Claims};

/// Claims of the access token that `require_auth` accepted for this request.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn username(&self) -> &str {
        &self.0.sub
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Only present behind `require_auth`; a route mounted outside it is a wiring bug.
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AppError::MissingHeader)
    }
}
