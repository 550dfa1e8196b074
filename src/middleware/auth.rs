use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{auth::AuthUser, errors::AppError, state::AppState};

/// Guards the protected router: a verified, unrevoked access token or 401.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = state.tokens.validate_request(req.headers()).map_err(|e| {
        tracing::debug!(error = %e, path = %req.uri().path(), "rejected request");
        e
    })?;

    if state.tokens.is_blacklisted(&bearer.token) {
        tracing::debug!(user = %bearer.claims.sub, "rejected revoked token");
        return Err(AppError::Revoked);
    }

    req.extensions_mut().insert(AuthUser(bearer.claims));
    Ok(next.run(req).await)
}
