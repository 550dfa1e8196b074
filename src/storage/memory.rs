use std::{cmp::Ordering, collections::BTreeMap};

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use super::{BookRepository, StorageError};
use crate::{
    models::book::Book,
    query::{ListParams, SortField, SortOrder},
};

#[derive(Default)]
pub struct InMemoryBookRepository {
    books: RwLock<BTreeMap<String, Book>>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn compare(a: &Book, b: &Book, field: SortField) -> Ordering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Title => a.title.cmp(&b.title),
        SortField::Author => a.author.cmp(&b.author),
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn list(&self, params: &ListParams) -> Result<(Vec<Book>, usize), StorageError> {
        let mut matches: Vec<Book> = self
            .books
            .read()
            .values()
            .filter(|b| params.title.as_deref().map_or(true, |t| contains_ci(&b.title, t)))
            .filter(|b| params.author.as_deref().map_or(true, |a| contains_ci(&b.author, a)))
            .cloned()
            .collect();

        // id as tie-breaker keeps pages stable
        matches.sort_by(|a, b| {
            let ord = compare(a, b, params.sort).then_with(|| a.id.cmp(&b.id));
            match params.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });

        let total = matches.len();
        let page = matches
            .into_iter()
            .skip(params.offset())
            .take(params.page_size)
            .collect();
        Ok((page, total))
    }

    async fn get(&self, id: &str) -> Result<Book, StorageError> {
        self.books
            .read()
            .get(id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn create(&self, mut book: Book) -> Result<Book, StorageError> {
        if book.id.is_empty() {
            book.id = Uuid::new_v4().to_string();
        }

        let mut books = self.books.write();
        if books.contains_key(&book.id) {
            return Err(StorageError::OperationFailed(format!(
                "duplicate key: book {} already exists",
                book.id
            )));
        }
        books.insert(book.id.clone(), book.clone());
        Ok(book)
    }

    async fn update(&self, book: &Book) -> Result<(), StorageError> {
        match self.books.write().get_mut(&book.id) {
            Some(stored) => {
                *stored = book.clone();
                Ok(())
            }
            None => Err(StorageError::NotFound),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.books
            .write()
            .remove(id)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: &str, title: &str, author: &str) -> Book {
        Book {
            id: id.into(),
            title: title.into(),
            author: author.into(),
        }
    }

    async fn seeded() -> InMemoryBookRepository {
        let repo = InMemoryBookRepository::new();
        for b in [
            book("1", "The Hobbit", "J. R. R. Tolkien"),
            book("2", "Dune", "Frank Herbert"),
            book("3", "The Silmarillion", "J. R. R. Tolkien"),
            book("4", "Neuromancer", "William Gibson"),
        ] {
            repo.create(b).await.unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn create_assigns_id_and_rejects_duplicates() {
        let repo = InMemoryBookRepository::new();
        let stored = repo.create(book("", "Dune", "Frank Herbert")).await.unwrap();
        assert!(!stored.id.is_empty());
        assert_eq!(repo.get(&stored.id).await.unwrap(), stored);

        let dup = repo.create(stored.clone()).await;
        assert!(matches!(dup, Err(StorageError::OperationFailed(_))));
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_rows() {
        let repo = seeded().await;
        assert_eq!(
            repo.update(&book("99", "x", "y")).await,
            Err(StorageError::NotFound)
        );
        assert_eq!(repo.delete("99").await, Err(StorageError::NotFound));

        repo.update(&book("2", "Dune Messiah", "Frank Herbert")).await.unwrap();
        assert_eq!(repo.get("2").await.unwrap().title, "Dune Messiah");

        repo.delete("2").await.unwrap();
        assert_eq!(repo.get("2").await, Err(StorageError::NotFound));
    }

    #[tokio::test]
    async fn list_filters_case_insensitively_and_counts_matches() {
        let repo = seeded().await;
        let params = ListParams {
            author: Some("tolkien".into()),
            ..ListParams::default()
        };
        let (page, total) = repo.list(&params).await.unwrap();
        assert_eq!(total, 2);
        let titles: Vec<_> = page.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["The Hobbit", "The Silmarillion"]);
    }

    #[tokio::test]
    async fn list_sorts_and_paginates() {
        let repo = seeded().await;
        let params = ListParams {
            page: 2,
            page_size: 3,
            sort: SortField::Title,
            order: SortOrder::Desc,
            ..ListParams::default()
        };
        let (page, total) = repo.list(&params).await.unwrap();
        assert_eq!(total, 4);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].title, "Dune");
    }
}
