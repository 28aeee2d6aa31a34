//! Data models for Biblioteca

pub mod book;
pub mod criteria;

pub use book::{Book, BookInput};
pub use criteria::{BookCriteria, BookFilter, SearchParams, YearRange};
