use thiserror::Error;

use super::book::BookId;

/// Failures of store operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Missing required fields: {}", .missing.join(", "))]
    Validation { missing: Vec<&'static str> },

    #[error("Book {0} not found")]
    NotFound(BookId),
}
