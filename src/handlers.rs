pub mod auth;
pub mod books;

use axum::{extract::rejection::JsonRejection, Json};

use crate::errors::AppError;

/// Body extraction with the crate's error shape instead of axum's plain-text rejection.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected request body");
        AppError::Validation("Invalid request body".into())
    })
}
