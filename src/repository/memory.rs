//! In-process book store
//!
//! Backs development runs without PostgreSQL and the test suites. A single
//! `RwLock` serializes writers; readers share it and never see a record
//! halfway through a write.

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;

use super::{conflict, not_found, BookStore};
use crate::{
    error::AppResult,
    models::book::{Book, BookFields},
};

#[derive(Default)]
pub struct MemoryBookStore {
    books: RwLock<IndexMap<String, Book>>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn list(&self) -> AppResult<Vec<Book>> {
        Ok(self.books.read().await.values().cloned().collect())
    }

    async fn get(&self, isbn: &str) -> AppResult<Book> {
        self.books
            .read()
            .await
            .get(isbn)
            .cloned()
            .ok_or_else(|| not_found(isbn))
    }

    async fn create(&self, book: Book) -> AppResult<Book> {
        let mut books = self.books.write().await;
        if books.contains_key(&book.isbn) {
            return Err(conflict(&book.isbn));
        }
        books.insert(book.isbn.clone(), book.clone());
        Ok(book)
    }

    async fn replace(&self, isbn: &str, fields: BookFields) -> AppResult<Book> {
        let mut books = self.books.write().await;
        let stored = books.get_mut(isbn).ok_or_else(|| not_found(isbn))?;
        *stored = Book::from_fields(isbn, fields);
        Ok(stored.clone())
    }

    async fn delete(&self, isbn: &str) -> AppResult<()> {
        // shift_remove keeps the remaining books in insertion order
        self.books
            .write()
            .await
            .shift_remove(isbn)
            .map(|_| ())
            .ok_or_else(|| not_found(isbn))
    }
}
