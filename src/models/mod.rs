//! Data models

pub mod book;

// Re-export commonly used types
pub use book::{Book, BookFields};
