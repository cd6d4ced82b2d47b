//! Book model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Book record, keyed by ISBN
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, Validate, ToSchema)]
pub struct Book {
    /// ISBN, primary key. Never changes after creation.
    #[validate(length(min = 1, message = "isbn must not be empty"))]
    pub isbn: String,
    /// Store page for the book
    #[validate(url(message = "amazon_url must be a well-formed URI"))]
    pub amazon_url: String,
    #[validate(length(min = 1, message = "author must not be empty"))]
    pub author: String,
    #[validate(length(min = 1, message = "language must not be empty"))]
    pub language: String,
    #[validate(range(min = 1, message = "pages must be greater than 0"))]
    pub pages: i32,
    #[validate(length(min = 1, message = "publisher must not be empty"))]
    pub publisher: String,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    /// Publication year (four digits)
    #[validate(range(min = 1000, max = 9999, message = "year must be a 4-digit year"))]
    pub year: i32,
}

/// Every book field except the ISBN, used for full replacement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct BookFields {
    #[validate(url(message = "amazon_url must be a well-formed URI"))]
    pub amazon_url: String,
    #[validate(length(min = 1, message = "author must not be empty"))]
    pub author: String,
    #[validate(length(min = 1, message = "language must not be empty"))]
    pub language: String,
    #[validate(range(min = 1, message = "pages must be greater than 0"))]
    pub pages: i32,
    #[validate(length(min = 1, message = "publisher must not be empty"))]
    pub publisher: String,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(range(min = 1000, max = 9999, message = "year must be a 4-digit year"))]
    pub year: i32,
}

impl Book {
    /// Build the stored record for `isbn` from replacement fields
    pub fn from_fields(isbn: impl Into<String>, fields: BookFields) -> Self {
        Self {
            isbn: isbn.into(),
            amazon_url: fields.amazon_url,
            author: fields.author,
            language: fields.language,
            pages: fields.pages,
            publisher: fields.publisher,
            title: fields.title,
            year: fields.year,
        }
    }
}
