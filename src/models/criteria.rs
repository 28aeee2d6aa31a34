//! Search criteria for the book catalog.
//!
//! [`BookFilter`] is the single predicate handed to a record store. The
//! in-memory store evaluates [`BookFilter::matches`] directly; the PostgreSQL
//! store translates the same criteria into SQL and must agree with it.

use serde::{de, Deserialize, Deserializer};
use utoipa::{IntoParams, ToSchema};

use super::book::Book;

/// Optional multi-criteria filter. Every provided criterion must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookCriteria {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// Case-insensitive substring of the author
    pub author: Option<String>,
    /// Exact category
    pub category: Option<String>,
    /// Exact publication year
    pub publication_year: Option<i32>,
}

impl BookCriteria {
    pub fn matches(&self, book: &Book) -> bool {
        self.title
            .as_deref()
            .map_or(true, |needle| contains_ignore_case(&book.title, needle))
            && self
                .author
                .as_deref()
                .map_or(true, |needle| contains_ignore_case(&book.author, needle))
            && self
                .category
                .as_deref()
                .map_or(true, |category| book.category.as_deref() == Some(category))
            && self
                .publication_year
                .map_or(true, |year| book.publication_year == Some(year))
    }
}

/// Inclusive publication year range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Books without a publication year never fall inside a range
    pub fn matches(&self, book: &Book) -> bool {
        book.publication_year
            .map_or(false, |year| self.start <= year && year <= self.end)
    }
}

/// Predicate over stored books
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BookFilter {
    #[default]
    All,
    Criteria(BookCriteria),
    YearRange(YearRange),
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        match self {
            BookFilter::All => true,
            BookFilter::Criteria(criteria) => criteria.matches(book),
            BookFilter::YearRange(range) => range.matches(book),
        }
    }
}

/// Query string of `GET /books/search`
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Title, partial match, case insensitive
    pub title: Option<String>,
    /// Author, partial match, case insensitive
    pub author: Option<String>,
    /// Category, exact match
    pub category: Option<String>,
    /// Publication year, exact match
    #[serde(default, deserialize_with = "empty_as_none")]
    pub publication_year: Option<i32>,
    /// Start year for range search (requires endYear)
    #[serde(default, deserialize_with = "empty_as_none")]
    pub start_year: Option<i32>,
    /// End year for range search (requires startYear)
    #[serde(default, deserialize_with = "empty_as_none")]
    pub end_year: Option<i32>,
}

impl SearchParams {
    /// A complete year range takes precedence: the other criteria are ignored.
    /// A lone start or end year is ignored as well.
    pub fn into_filter(self) -> BookFilter {
        if let (Some(start), Some(end)) = (self.start_year, self.end_year) {
            if self.has_criteria() {
                tracing::debug!(
                    "Year range {}..={} supplied, ignoring title/author/category/year criteria",
                    start,
                    end
                );
            }
            return BookFilter::YearRange(YearRange::new(start, end));
        }

        BookFilter::Criteria(BookCriteria {
            title: self.title,
            author: self.author,
            category: self.category,
            publication_year: self.publication_year,
        })
    }

    fn has_criteria(&self) -> bool {
        self.title.is_some()
            || self.author.is_some()
            || self.category.is_some()
            || self.publication_year.is_some()
    }
}

/// `?publicationYear=` is the same as leaving the parameter out
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid year: {}", raw))),
        _ => Ok(None),
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
