use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use std::sync::Arc;

use crate::{
    auth::{tokens::IssuedTokens, AuthUser},
    dto::auth::{LoginRequest, MeResponse, MessageResponse, RefreshRequest, RegisterRequest},
    errors::AppError,
    handlers::json_body,
    state::AppState,
};

/// Runs password hashing off the async workers.
async fn blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(format!("password task failed: {e}")))?
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let req = json_body(payload)?;
    let tokens = state.tokens.clone();
    blocking(move || tokens.register(&req.username, &req.password)).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully",
        }),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<IssuedTokens>, AppError> {
    let req = json_body(payload)?;
    let tokens = state.tokens.clone();
    let pair = blocking(move || tokens.login(&req.username, &req.password)).await?;
    Ok(Json(pair))
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<IssuedTokens>, AppError> {
    let req = json_body(payload)?;
    let pair = state.tokens.refresh(&req.refresh_token)?;
    Ok(Json(pair))
}

/// Revokes the access token that authenticated this request.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, AppError> {
    let bearer = state.tokens.validate_request(&headers)?;
    state.tokens.logout(&bearer.token)?;

    Ok(Json(MessageResponse {
        message: "Logged out successfully",
    }))
}

pub async fn me(user: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        username: user.username().to_string(),
    })
}
