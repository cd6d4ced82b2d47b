//! Book store: CRUD over persistent storage, keyed by ISBN
//!
//! Data handed to a store is already validated; stores only enforce
//! existence and uniqueness of the ISBN.

pub mod books;
pub mod memory;

use async_trait::async_trait;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookFields},
};

pub use books::PgBookStore;
pub use memory::MemoryBookStore;

/// Keyed collection of book records.
///
/// Writes on the same ISBN are serialized by the implementation: two racing
/// `create` calls yield one success and one `Conflict`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books in insertion order
    async fn list(&self) -> AppResult<Vec<Book>>;

    /// Fails with `NotFound` when no book has this ISBN
    async fn get(&self, isbn: &str) -> AppResult<Book>;

    /// Fails with `Conflict` when the ISBN is taken
    async fn create(&self, book: Book) -> AppResult<Book>;

    /// Overwrite every field but the ISBN. Fails with `NotFound` when absent.
    async fn replace(&self, isbn: &str, fields: BookFields) -> AppResult<Book>;

    /// Fails with `NotFound` when absent
    async fn delete(&self, isbn: &str) -> AppResult<()>;

    /// Check that the backing storage answers
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

pub(crate) fn not_found(isbn: &str) -> AppError {
    AppError::NotFound(format!("Book {} not found", isbn))
}

pub(crate) fn conflict(isbn: &str) -> AppError {
    AppError::Conflict(format!("Book with isbn {} already exists", isbn))
}
