//! Catalog module
//!
//! Book records, the in-memory store that owns them, and startup seeding.

mod book;
mod error;
mod seed;
mod store;

pub use book::{BookId, BookPatch, NewBook};
pub use error::CatalogError;
pub use seed::build_store;
pub use store::BookStore;
