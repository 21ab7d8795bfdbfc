//! In-memory book store
//!
//! Holds the authoritative list of books for the lifetime of the process.
//! Every operation takes the same async mutex, so id assignment and
//! lookup-then-mutate sequences are atomic across worker threads.

use tokio::sync::Mutex;

use super::book::{Book, BookId, BookPatch, NewBook};
use super::error::CatalogError;

struct Inner {
    books: Vec<Book>,
    /// Next id to hand out. Only ever incremented.
    next_id: BookId,
}

impl Inner {
    fn position(&self, id: BookId) -> Result<usize, CatalogError> {
        self.books
            .iter()
            .position(|book| book.id == id)
            .ok_or(CatalogError::NotFound(id))
    }
}

pub struct BookStore {
    inner: Mutex<Inner>,
}

impl BookStore {
    /// Create an empty store; the first created book gets id 1
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                books: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Create a store pre-populated with `seed`, assigning ids `1..=n`
    pub fn with_books(seed: Vec<NewBook>) -> Result<Self, CatalogError> {
        let mut inner = Inner {
            books: Vec::with_capacity(seed.len()),
            next_id: 1,
        };
        for payload in seed {
            let book = payload.into_book(inner.next_id)?;
            inner.next_id += 1;
            inner.books.push(book);
        }
        Ok(Self {
            inner: Mutex::new(inner),
        })
    }

    /// All books, insertion order preserved
    pub async fn list(&self) -> Vec<Book> {
        self.inner.lock().await.books.clone()
    }

    pub async fn get(&self, id: BookId) -> Result<Book, CatalogError> {
        let inner = self.inner.lock().await;
        let index = inner.position(id)?;
        Ok(inner.books[index].clone())
    }

    pub async fn contains(&self, id: BookId) -> bool {
        self.inner.lock().await.position(id).is_ok()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.books.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Validate and append a new book. The store is left untouched on error.
    pub async fn create(&self, payload: NewBook) -> Result<Book, CatalogError> {
        let mut inner = self.inner.lock().await;
        let book = payload.into_book(inner.next_id)?;
        inner.next_id += 1;
        inner.books.push(book.clone());
        Ok(book)
    }

    /// Overwrite the fields present in `patch` and return the result
    pub async fn update(&self, id: BookId, patch: BookPatch) -> Result<Book, CatalogError> {
        let mut inner = self.inner.lock().await;
        let index = inner.position(id)?;
        let book = &mut inner.books[index];
        patch.apply(book);
        Ok(book.clone())
    }

    /// Remove a book and hand it back
    pub async fn delete(&self, id: BookId) -> Result<Book, CatalogError> {
        let mut inner = self.inner.lock().await;
        let index = inner.position(id)?;
        Ok(inner.books.remove(index))
    }
}

impl Default for BookStore {
    fn default() -> Self {
        Self::new()
    }
}
