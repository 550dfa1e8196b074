use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;

use crate::{
    handlers::{auth as auth_handlers, books as book_handlers},
    middleware::{log_requests, require_auth},
    state::AppState,
};

pub fn app_router(state: Arc<AppState>) -> Router {
    // register/login/refresh stay outside the guard
    let public = Router::new()
        .route("/auth/register", post(auth_handlers::register))
        .route("/auth/login", post(auth_handlers::login))
        .route("/auth/refresh", post(auth_handlers::refresh));

    let protected = Router::new()
        .route("/auth/logout", post(auth_handlers::logout))
        .route("/auth/me", get(auth_handlers::me))
        .route(
            "/books",
            get(book_handlers::list_books).post(book_handlers::create_book),
        )
        .route(
            "/books/{id}",
            get(book_handlers::get_book)
                .put(book_handlers::update_book)
                .delete(book_handlers::delete_book),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(ServiceBuilder::new().layer(from_fn_with_state(
            state.request_log.clone(),
            log_requests,
        )))
        .with_state(state)
}
