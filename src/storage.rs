//! Storage contract for the books resource.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::{models::book::Book, query::ListParams};

pub use memory::InMemoryBookRepository;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("resource not found")]
    NotFound,

    #[error("database operation failed: {0}")]
    OperationFailed(String),
}

#[async_trait]
pub trait BookRepository: Send + Sync + 'static {
    /// One page of matching books plus the total number of matches.
    async fn list(&self, params: &ListParams) -> Result<(Vec<Book>, usize), StorageError>;

    async fn get(&self, id: &str) -> Result<Book, StorageError>;

    /// Stores `book`, assigning an id when it has none. Returns the stored book.
    async fn create(&self, book: Book) -> Result<Book, StorageError>;

    async fn update(&self, book: &Book) -> Result<(), StorageError>;

    async fn delete(&self, id: &str) -> Result<(), StorageError>;
}
