// Books resource handlers
// One function per store operation; each returns a finished response

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body as HttpBody, Bytes};
use hyper::{Request, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::catalog::{BookId, BookPatch, CatalogError, NewBook};
use crate::config::AppState;
use crate::http::{self, Body};
use crate::logger;

const MISSING_FIELDS: &str = "Missing required fields";
const NOT_FOUND: &str = "Book not found.";
const CREATE_FAILED: &str = "Failed to add a new book.";
const UPDATE_FAILED: &str = "Failed to update book.";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why a request body could not be turned into a payload
enum BodyError {
    TooLarge,
    Unreadable(BoxError),
    Malformed(serde_json::Error),
}

/// Read at most `limit` bytes of body and decode it as JSON
async fn read_json<T, B>(req: Request<B>, limit: u64) -> Result<T, BodyError>
where
    T: DeserializeOwned,
    B: HttpBody<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let bytes = match Limited::new(req.into_body(), limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is::<LengthLimitError>() => return Err(BodyError::TooLarge),
        Err(e) => return Err(BodyError::Unreadable(e)),
    };
    serde_json::from_slice(&bytes).map_err(BodyError::Malformed)
}

/// Map a body failure to a response; `malformed` is the route's 500 message
fn body_error_response(err: BodyError, malformed: &str) -> Response<Body> {
    match err {
        BodyError::TooLarge => http::build_413_response(),
        BodyError::Unreadable(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            http::error_response(StatusCode::BAD_REQUEST, "Failed to read request body")
        }
        BodyError::Malformed(e) => {
            logger::log_warning(&format!("Invalid JSON body: {e}"));
            http::error_response(StatusCode::INTERNAL_SERVER_ERROR, malformed)
        }
    }
}

fn catalog_error_response(err: &CatalogError) -> Response<Body> {
    match err {
        CatalogError::Validation { .. } => {
            logger::log_debug(&format!("Rejected book: {err}"));
            http::error_response(StatusCode::BAD_REQUEST, MISSING_FIELDS)
        }
        CatalogError::NotFound(_) => http::error_response(StatusCode::NOT_FOUND, NOT_FOUND),
    }
}

fn not_found() -> Response<Body> {
    http::error_response(StatusCode::NOT_FOUND, NOT_FOUND)
}

/// GET /books
pub async fn list_books(state: &AppState) -> Response<Body> {
    let books = state.store.list().await;
    http::json_response(StatusCode::OK, &books)
}

/// POST /books
pub async fn create_book<B>(req: Request<B>, state: &AppState) -> Response<Body>
where
    B: HttpBody<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let payload: NewBook = match read_json(req, state.config.http.max_body_size).await {
        Ok(p) => p,
        Err(e) => return body_error_response(e, CREATE_FAILED),
    };

    match state.store.create(payload).await {
        Ok(book) => {
            logger::log_debug(&format!("Created book {} ({})", book.id, book.title));
            http::json_response(StatusCode::CREATED, &book)
        }
        Err(e) => catalog_error_response(&e),
    }
}

/// GET /books/{id}
pub async fn get_book(id: Option<BookId>, state: &AppState) -> Response<Body> {
    let Some(id) = id else {
        return not_found();
    };
    match state.store.get(id).await {
        Ok(book) => http::json_response(StatusCode::OK, &book),
        Err(e) => catalog_error_response(&e),
    }
}

/// PUT /books/{id}
///
/// Existence is checked before the body is decoded, so an unknown id is a
/// 404 whatever the body holds.
pub async fn update_book<B>(req: Request<B>, id: Option<BookId>, state: &AppState) -> Response<Body>
where
    B: HttpBody<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let Some(id) = id else {
        return not_found();
    };
    if !state.store.contains(id).await {
        return not_found();
    }

    let patch: BookPatch = match read_json(req, state.config.http.max_body_size).await {
        Ok(p) => p,
        Err(e) => return body_error_response(e, UPDATE_FAILED),
    };
    if patch.is_empty() {
        logger::log_debug(&format!("Update for book {id} changes nothing"));
    }

    // the book may have been deleted while the body was in flight
    match state.store.update(id, patch).await {
        Ok(book) => {
            logger::log_debug(&format!("Updated book {id}"));
            http::json_response(StatusCode::OK, &book)
        }
        Err(e) => catalog_error_response(&e),
    }
}

/// DELETE /books/{id}, answers 200 with the removed record
pub async fn delete_book(id: Option<BookId>, state: &AppState) -> Response<Body> {
    let Some(id) = id else {
        return not_found();
    };
    match state.store.delete(id).await {
        Ok(book) => {
            logger::log_debug(&format!("Deleted book {id} ({})", book.title));
            http::json_response(StatusCode::OK, &book)
        }
        Err(e) => catalog_error_response(&e),
    }
}
