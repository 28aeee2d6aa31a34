//! Repository layer: the book record store and its backends

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{Book, BookFilter, BookInput},
};

pub use memory::MemoryBookStore;
pub use postgres::PgBookStore;

pub const DUPLICATE_BOOK_MESSAGE: &str = "A book with the same title and author already exists";

/// Text columns that can be projected or counted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookField {
    Author,
    Category,
}

impl BookField {
    pub fn column(self) -> &'static str {
        match self {
            BookField::Author => "author",
            BookField::Category => "category",
        }
    }

    pub fn value(self, book: &Book) -> Option<&str> {
        match self {
            BookField::Author => Some(book.author.as_str()),
            BookField::Category => book.category.as_deref(),
        }
    }
}

/// Persistent collection of books keyed by id.
///
/// Every method is atomic on its own. Implementations reject a duplicate
/// (title, author) pair with `AppError::Conflict` even if the caller already
/// checked, so concurrent writers cannot create duplicates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Store a new book under a freshly assigned id
    async fn insert(&self, input: &BookInput) -> AppResult<Book>;

    async fn get(&self, id: i64) -> AppResult<Option<Book>>;

    /// Overwrite every mutable field. `AppError::NotFound` if absent.
    async fn update(&self, id: i64, input: &BookInput) -> AppResult<Book>;

    /// `AppError::NotFound` if absent
    async fn delete(&self, id: i64) -> AppResult<()>;

    async fn exists(&self, id: i64) -> AppResult<bool>;

    /// Exact, case-sensitive pair lookup
    async fn exists_by_title_author(&self, title: &str, author: &str) -> AppResult<bool>;

    /// Books matching `filter`, ordered by id
    async fn scan(&self, filter: &BookFilter) -> AppResult<Vec<Book>>;

    /// Sorted unique non-null values of `field`
    async fn distinct(&self, field: BookField) -> AppResult<Vec<String>>;

    /// Number of books whose `field` equals `value`
    async fn count_by(&self, field: BookField, value: &str) -> AppResult<i64>;

    /// Check that the backend is reachable
    async fn ping(&self) -> AppResult<()>;
}
