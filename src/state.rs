use std::sync::Arc;

use crate::{
    config::Config,
    errors::AppError,
    middleware::RequestLogSettings,
    services::auth_service::TokenService,
    storage::{BookRepository, InMemoryBookRepository},
};

#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub books: Arc<dyn BookRepository>,
    pub request_log: RequestLogSettings,
}

impl AppState {
    pub fn new(cfg: &Config) -> Result<Self, AppError> {
        Self::with_repository(cfg, Arc::new(InMemoryBookRepository::new()))
    }

    pub fn with_repository(cfg: &Config, books: Arc<dyn BookRepository>) -> Result<Self, AppError> {
        let tokens = TokenService::from_config(cfg)?;
        Ok(Self {
            tokens: Arc::new(tokens),
            books,
            request_log: RequestLogSettings {
                max_body_bytes: cfg.max_logged_body_bytes,
            },
        })
    }
}
