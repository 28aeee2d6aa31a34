//! Book model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Book record as stored in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique ID, assigned on creation
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Don Quixote")]
    pub title: String,
    #[schema(example = "Miguel de Cervantes")]
    pub author: String,
    #[schema(example = 1605, minimum = 1000, maximum = 2100)]
    pub publication_year: Option<i32>,
    /// Category or genre
    #[schema(example = "Novel")]
    pub category: Option<String>,
}

/// Create / update book request
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookInput {
    #[validate(
        custom(function = "not_blank", message = "Book title is required"),
        length(min = 1, max = 255, message = "Title must be between 1 and 255 characters")
    )]
    #[schema(example = "Don Quixote")]
    pub title: String,
    #[validate(
        custom(function = "not_blank", message = "Author name is required"),
        length(min = 1, max = 255, message = "Author name must be between 1 and 255 characters")
    )]
    #[schema(example = "Miguel de Cervantes")]
    pub author: String,
    #[validate(range(min = 1000, max = 2100, message = "Publication year must be between 1000 and 2100"))]
    #[schema(example = 1605, minimum = 1000, maximum = 2100)]
    pub publication_year: Option<i32>,
    #[validate(length(max = 100, message = "Category must be maximum 100 characters"))]
    #[schema(example = "Novel")]
    pub category: Option<String>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

impl BookInput {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            publication_year: None,
            category: None,
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.publication_year = Some(year);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// True when this input names a different title/author pair than `book`
    pub fn changes_identity_of(&self, book: &Book) -> bool {
        self.title != book.title || self.author != book.author
    }

    /// Build the stored record for a freshly assigned id
    pub fn into_book(self, id: i64) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            publication_year: self.publication_year,
            category: self.category,
        }
    }
}
