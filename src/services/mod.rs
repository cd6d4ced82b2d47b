//! Business logic services

pub mod books;

use std::sync::Arc;

use crate::{repository::BookStore, validation::ValidationPolicy};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
}

impl Services {
    /// Create all services over the given book store
    pub fn new(store: Arc<dyn BookStore>, policy: ValidationPolicy) -> Self {
        Self {
            books: books::BooksService::new(store, policy),
        }
    }
}
