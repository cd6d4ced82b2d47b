//! Book catalog service
//!
//! Sequences schema validation and store calls for the five catalog
//! operations. Store failures are returned untouched.

use std::sync::Arc;

use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::book::Book,
    repository::BookStore,
    validation::{self, ValidationPolicy},
};

#[derive(Clone)]
pub struct BooksService {
    store: Arc<dyn BookStore>,
    policy: ValidationPolicy,
}

impl BooksService {
    pub fn new(store: Arc<dyn BookStore>, policy: ValidationPolicy) -> Self {
        Self { store, policy }
    }

    /// List every book, oldest first
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.store.list().await
    }

    pub async fn get(&self, isbn: &str) -> AppResult<Book> {
        self.store.get(isbn).await
    }

    /// Validate a payload and store it as a new book
    pub async fn create(&self, payload: &Value) -> AppResult<Book> {
        let book = validation::validate_book(payload, &self.policy).map_err(AppError::Validation)?;

        let created = self.store.create(book).await?;
        tracing::info!(isbn = %created.isbn, "Book created");
        Ok(created)
    }

    /// Validate a full payload and overwrite the book at `isbn`
    pub async fn replace(&self, isbn: &str, payload: &Value) -> AppResult<Book> {
        let fields = validation::validate_replacement(isbn, payload, &self.policy)
            .map_err(AppError::Validation)?;

        let updated = self.store.replace(isbn, fields).await?;
        tracing::info!(isbn = %isbn, "Book replaced");
        Ok(updated)
    }

    pub async fn delete(&self, isbn: &str) -> AppResult<()> {
        self.store.delete(isbn).await?;
        tracing::info!(isbn = %isbn, "Book deleted");
        Ok(())
    }

    /// Readiness of the backing store
    pub async fn ready(&self) -> AppResult<()> {
        self.store.ping().await
    }
}
