use std::{future::Future, sync::Arc, time::Duration};

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    dto::books::{DataResponse, ListResponse, Pagination},
    errors::AppError,
    handlers::json_body,
    models::book::Book,
    query::{ListParams, ListQuery},
    state::AppState,
    storage::StorageError,
};

const REPOSITORY_TIMEOUT: Duration = Duration::from_secs(5);

async fn bounded<T>(op: impl Future<Output = Result<T, StorageError>>) -> Result<T, AppError> {
    Ok(tokio::time::timeout(REPOSITORY_TIMEOUT, op).await??)
}

pub async fn list_books(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse<Book>>, AppError> {
    let params = ListParams::from(query);
    let (books, total) = bounded(state.books.list(&params)).await.map_err(|e| {
        tracing::error!(error = %e, "failed to list books");
        e
    })?;

    Ok(Json(ListResponse {
        data: books,
        pagination: Pagination::new(&params, total),
    }))
}

pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<Book>>, AppError> {
    let book = bounded(state.books.get(&id)).await?;
    Ok(Json(DataResponse { data: book }))
}

pub async fn create_book(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Book>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<Book>>), AppError> {
    let book = json_body(payload)?;
    let created = bounded(state.books.create(book)).await?;
    tracing::info!(id = %created.id, "book created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// The id in the path wins over any id in the body.
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<Book>, JsonRejection>,
) -> Result<Json<DataResponse<Book>>, AppError> {
    let mut book = json_body(payload)?;
    book.id = id;
    bounded(state.books.update(&book)).await?;

    Ok(Json(DataResponse { data: book }))
}

pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    bounded(state.books.delete(&id)).await?;
    tracing::info!(id = %id, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}
