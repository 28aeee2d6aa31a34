//! In-process book store

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{BookField, BookStore, DUPLICATE_BOOK_MESSAGE};
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookFilter, BookInput},
};

/// Books kept in a map behind a lock. Ids start at 1 and are never reused.
#[derive(Debug)]
pub struct MemoryBookStore {
    books: RwLock<BTreeMap<i64, Book>>,
    next_id: AtomicI64,
}

impl Default for MemoryBookStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self {
            books: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

fn pair_taken(books: &BTreeMap<i64, Book>, input: &BookInput, except: Option<i64>) -> bool {
    books.values().any(|book| {
        Some(book.id) != except && book.title == input.title && book.author == input.author
    })
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn insert(&self, input: &BookInput) -> AppResult<Book> {
        let mut books = self.books.write().await;
        if pair_taken(&books, input, None) {
            return Err(AppError::Conflict(DUPLICATE_BOOK_MESSAGE.to_string()));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let book = input.clone().into_book(id);
        books.insert(id, book.clone());
        Ok(book)
    }

    async fn get(&self, id: i64) -> AppResult<Option<Book>> {
        Ok(self.books.read().await.get(&id).cloned())
    }

    async fn update(&self, id: i64, input: &BookInput) -> AppResult<Book> {
        let mut books = self.books.write().await;
        if !books.contains_key(&id) {
            return Err(AppError::NotFound(format!("Book not found with id: {}", id)));
        }
        if pair_taken(&books, input, Some(id)) {
            return Err(AppError::Conflict(DUPLICATE_BOOK_MESSAGE.to_string()));
        }

        let book = input.clone().into_book(id);
        books.insert(id, book.clone());
        Ok(book)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        self.books
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Book not found with id: {}", id)))
    }

    async fn exists(&self, id: i64) -> AppResult<bool> {
        Ok(self.books.read().await.contains_key(&id))
    }

    async fn exists_by_title_author(&self, title: &str, author: &str) -> AppResult<bool> {
        Ok(self
            .books
            .read()
            .await
            .values()
            .any(|book| book.title == title && book.author == author))
    }

    async fn scan(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        Ok(self
            .books
            .read()
            .await
            .values()
            .filter(|book| filter.matches(book))
            .cloned()
            .collect())
    }

    async fn distinct(&self, field: BookField) -> AppResult<Vec<String>> {
        let books = self.books.read().await;
        let values: BTreeSet<&str> = books.values().filter_map(|book| field.value(book)).collect();
        Ok(values.into_iter().map(str::to_string).collect())
    }

    async fn count_by(&self, field: BookField, value: &str) -> AppResult<i64> {
        let count = self
            .books
            .read()
            .await
            .values()
            .filter(|book| field.value(book) == Some(value))
            .count();
        Ok(count as i64)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookCriteria, YearRange};

    async fn seeded() -> MemoryBookStore {
        let store = MemoryBookStore::new();
        for input in [
            BookInput::new("Don Quixote", "Cervantes").with_year(1605).with_category("Novel"),
            BookInput::new("Hamlet", "Shakespeare").with_year(1600).with_category("Play"),
            BookInput::new("Macbeth", "Shakespeare").with_year(1606).with_category("Play"),
            BookInput::new("Beowulf", "Anonymous"),
        ] {
            store.insert(&input).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_insert_assigns_ids_and_get_round_trips() {
        let store = MemoryBookStore::new();
        let first = store.insert(&BookInput::new("A", "X")).await.unwrap();
        let second = store.insert(&BookInput::new("B", "X").with_year(1999)).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.get(second.id).await.unwrap(), Some(second));
        assert_eq!(store.get(42).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let store = MemoryBookStore::new();
        let first = store.insert(&BookInput::new("A", "X")).await.unwrap();
        store.delete(first.id).await.unwrap();
        let second = store.insert(&BookInput::new("A", "X")).await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_duplicate_pair_is_rejected_by_store() {
        let store = seeded().await;
        let err = store.insert(&BookInput::new("Hamlet", "Shakespeare")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        // Case differs: a different pair
        assert!(store.insert(&BookInput::new("hamlet", "Shakespeare")).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_keeps_own_pair_and_rejects_others() {
        let store = seeded().await;
        let updated = store
            .update(2, &BookInput::new("Hamlet", "Shakespeare").with_category("Tragedy"))
            .await
            .unwrap();
        assert_eq!(updated.category.as_deref(), Some("Tragedy"));
        assert_eq!(updated.publication_year, None);

        let err = store.update(3, &BookInput::new("Hamlet", "Shakespeare")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let err = store.update(99, &BookInput::new("X", "Y")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = seeded().await;
        store.delete(1).await.unwrap();
        assert!(!store.exists(1).await.unwrap());
        assert!(matches!(store.delete(1).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_exists_by_title_author_is_exact() {
        let store = seeded().await;
        assert!(store.exists_by_title_author("Hamlet", "Shakespeare").await.unwrap());
        assert!(!store.exists_by_title_author("HAMLET", "Shakespeare").await.unwrap());
        assert!(!store.exists_by_title_author("Hamlet", "Cervantes").await.unwrap());
    }

    #[tokio::test]
    async fn test_scan_orders_by_id() {
        let store = seeded().await;
        let all = store.scan(&BookFilter::All).await.unwrap();
        let ids: Vec<i64> = all.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);

        let plays = store
            .scan(&BookFilter::Criteria(BookCriteria {
                category: Some("Play".into()),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(plays.iter().map(|b| b.id).collect::<Vec<_>>(), vec![2, 3]);

        let range = store.scan(&BookFilter::YearRange(YearRange::new(1600, 1605))).await.unwrap();
        assert_eq!(range.iter().map(|b| b.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_distinct_and_count() {
        let store = seeded().await;
        assert_eq!(store.distinct(BookField::Category).await.unwrap(), vec!["Novel", "Play"]);
        assert_eq!(
            store.distinct(BookField::Author).await.unwrap(),
            vec!["Anonymous", "Cervantes", "Shakespeare"]
        );
        assert_eq!(store.count_by(BookField::Category, "Play").await.unwrap(), 2);
        assert_eq!(store.count_by(BookField::Category, "play").await.unwrap(), 0);
        assert_eq!(store.count_by(BookField::Author, "Anonymous").await.unwrap(), 1);
    }
}
