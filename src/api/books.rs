//! Book catalog endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{Book, BookInput, SearchParams},
    AppState,
};

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "List of books", body = Vec<Book>),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.list_all().await?;
    Ok(Json(books))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Unique ID of the book", example = 1)),
    responses(
        (status = 200, description = "Book found", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_by_id(id).await?;
    Ok(Json(book))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookInput,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input or book already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let Json(input) = payload?;
    input.validate()?;
    let book = state.services.catalog.create(input).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Update an existing book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Unique ID of the book", example = 1)),
    request_body = BookInput,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid input or book already exists", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> AppResult<Json<Book>> {
    let Json(input) = payload?;
    input.validate()?;
    let book = state.services.catalog.update(id, input).await?;
    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Unique ID of the book", example = 1)),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Search books by multiple criteria or by publication year range.
///
/// When both `startYear` and `endYear` are given, only the range applies.
#[utoipa::path(
    get,
    path = "/books/search",
    tag = "books",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching books", body = Vec<Book>)
    )
)]
pub async fn search_books(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<Book>>> {
    let filter = params.into_filter();
    let books = state.services.catalog.search(&filter).await?;
    Ok(Json(books))
}

/// List distinct categories
#[utoipa::path(
    get,
    path = "/books/categories",
    tag = "books",
    responses(
        (status = 200, description = "Sorted unique categories", body = Vec<String>)
    )
)]
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let categories = state.services.catalog.list_distinct_categories().await?;
    Ok(Json(categories))
}

/// List distinct authors
#[utoipa::path(
    get,
    path = "/books/authors",
    tag = "books",
    responses(
        (status = 200, description = "Sorted unique authors", body = Vec<String>)
    )
)]
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let authors = state.services.catalog.list_distinct_authors().await?;
    Ok(Json(authors))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CountQuery {
    /// Category, exact match
    pub category: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

/// Count books in a category
#[utoipa::path(
    get,
    path = "/books/count",
    tag = "books",
    params(CountQuery),
    responses(
        (status = 200, description = "Number of books in the category", body = CategoryCount)
    )
)]
pub async fn count_by_category(
    State(state): State<AppState>,
    Query(query): Query<CountQuery>,
) -> AppResult<Json<CategoryCount>> {
    let count = state.services.catalog.count_by_category(&query.category).await?;
    Ok(Json(CategoryCount {
        category: query.category,
        count,
    }))
}
