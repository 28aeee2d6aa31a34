//! PostgreSQL book store

use async_trait::async_trait;
use sqlx::{Pool, Postgres, QueryBuilder};

use super::{BookField, BookStore, DUPLICATE_BOOK_MESSAGE};
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookCriteria, BookFilter, BookInput, YearRange},
};

const BOOK_COLUMNS: &str = "id, title, author, publication_year, category";

#[derive(Clone)]
pub struct PgBookStore {
    pool: Pool<Postgres>,
}

impl PgBookStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// The books_title_author_key constraint reports as a Conflict
fn map_write_error(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(DUPLICATE_BOOK_MESSAGE.to_string())
        }
        _ => AppError::Database(e),
    }
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Book not found with id: {}", id))
}

/// Append the WHERE clause equivalent of `BookFilter::matches`
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &BookFilter) {
    builder.push(" WHERE 1=1");
    match filter {
        BookFilter::All => {}
        BookFilter::Criteria(criteria) => push_criteria(builder, criteria),
        BookFilter::YearRange(YearRange { start, end }) => {
            builder
                .push(" AND publication_year BETWEEN ")
                .push_bind(*start)
                .push(" AND ")
                .push_bind(*end);
        }
    }
}

fn push_criteria(builder: &mut QueryBuilder<'_, Postgres>, criteria: &BookCriteria) {
    // strpos keeps the match literal; LIKE would treat % and _ as wildcards
    if let Some(title) = &criteria.title {
        builder
            .push(" AND strpos(LOWER(title), LOWER(")
            .push_bind(title.clone())
            .push(")) > 0");
    }
    if let Some(author) = &criteria.author {
        builder
            .push(" AND strpos(LOWER(author), LOWER(")
            .push_bind(author.clone())
            .push(")) > 0");
    }
    if let Some(category) = &criteria.category {
        builder.push(" AND category = ").push_bind(category.clone());
    }
    if let Some(year) = criteria.publication_year {
        builder.push(" AND publication_year = ").push_bind(year);
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn insert(&self, input: &BookInput) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, author, publication_year, category)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&input.title)
        .bind(&input.author)
        .bind(input.publication_year)
        .bind(&input.category)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn get(&self, id: i64) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn update(&self, id: i64, input: &BookInput) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books
            SET title = $2, author = $3, publication_year = $4, category = $5
            WHERE id = $1
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(id)
        .bind(&input.title)
        .bind(&input.author)
        .bind(input.publication_year)
        .bind(&input.category)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or_else(|| not_found(id))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn exists(&self, id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn exists_by_title_author(&self, title: &str, author: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM books WHERE title = $1 AND author = $2)",
        )
        .bind(title)
        .bind(author)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn scan(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM books", BOOK_COLUMNS));
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY id");

        let books = builder.build_query_as::<Book>().fetch_all(&self.pool).await?;
        Ok(books)
    }

    async fn distinct(&self, field: BookField) -> AppResult<Vec<String>> {
        let column = field.column();
        let values: Vec<String> = sqlx::query_scalar(&format!(
            "SELECT DISTINCT {col} FROM books WHERE {col} IS NOT NULL ORDER BY {col}",
            col = column
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(values)
    }

    async fn count_by(&self, field: BookField, value: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM books WHERE {} = $1",
            field.column()
        ))
        .bind(value)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
