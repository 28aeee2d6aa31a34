//! Catalog management service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookCriteria, BookFilter, BookInput, YearRange},
    repository::{BookField, BookStore, DUPLICATE_BOOK_MESSAGE},
};

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn BookStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> AppResult<Vec<Book>> {
        self.store.scan(&BookFilter::All).await
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book not found with id: {}", id)))
    }

    /// Create a book, rejecting an existing title/author pair
    pub async fn create(&self, input: BookInput) -> AppResult<Book> {
        if self
            .store
            .exists_by_title_author(&input.title, &input.author)
            .await?
        {
            return Err(AppError::Conflict(DUPLICATE_BOOK_MESSAGE.to_string()));
        }

        let book = self.store.insert(&input).await?;
        tracing::info!("Catalog: created book id={} ({:?} by {:?})", book.id, book.title, book.author);
        Ok(book)
    }

    /// Replace every mutable field of a book.
    /// The pair is only re-checked when title or author actually changes.
    pub async fn update(&self, id: i64, input: BookInput) -> AppResult<Book> {
        let current = self.get_by_id(id).await?;

        if input.changes_identity_of(&current)
            && self
                .store
                .exists_by_title_author(&input.title, &input.author)
                .await?
        {
            return Err(AppError::Conflict(DUPLICATE_BOOK_MESSAGE.to_string()));
        }

        let book = self.store.update(id, &input).await?;
        tracing::info!("Catalog: updated book id={}", id);
        Ok(book)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.store.exists(id).await? {
            return Err(AppError::NotFound(format!("Book not found with id: {}", id)));
        }
        self.store.delete(id).await?;
        tracing::info!("Catalog: deleted book id={}", id);
        Ok(())
    }

    pub async fn search(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        self.store.scan(filter).await
    }

    pub async fn search_by_criteria(&self, criteria: BookCriteria) -> AppResult<Vec<Book>> {
        self.search(&BookFilter::Criteria(criteria)).await
    }

    pub async fn search_by_year_range(&self, start: i32, end: i32) -> AppResult<Vec<Book>> {
        self.search(&BookFilter::YearRange(YearRange::new(start, end))).await
    }

    pub async fn list_distinct_categories(&self) -> AppResult<Vec<String>> {
        self.store.distinct(BookField::Category).await
    }

    pub async fn list_distinct_authors(&self) -> AppResult<Vec<String>> {
        self.store.distinct(BookField::Author).await
    }

    pub async fn count_by_category(&self, category: &str) -> AppResult<i64> {
        self.store.count_by(BookField::Category, category).await
    }

    /// Readiness check for the underlying store
    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }
}
