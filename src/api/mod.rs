// API module entry
// REST interface over the book store: /books and /books/{id}

mod books;

use hyper::body::{Body as HttpBody, Bytes};
use hyper::{Method, Request, Response};

use crate::catalog::BookId;
use crate::config::AppState;
use crate::http::{self, Body};

/// Methods served on `/books`
pub const COLLECTION_ALLOW: &str = "GET, POST, OPTIONS";
/// Methods served on `/books/{id}`
pub const ITEM_ALLOW: &str = "GET, PUT, DELETE, OPTIONS";

/// A path under the books resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooksRoute {
    Collection,
    /// `None` when the segment is not a valid id; such a book never exists
    Item(Option<BookId>),
}

/// Match `/books`, `/books/{id}` (trailing slash tolerated)
pub fn match_route(path: &str) -> Option<BooksRoute> {
    let rest = path.strip_prefix("/books")?;
    if rest.is_empty() || rest == "/" {
        return Some(BooksRoute::Collection);
    }

    let segment = rest.strip_prefix('/')?;
    let segment = segment.strip_suffix('/').unwrap_or(segment);
    if segment.is_empty() || segment.contains('/') {
        return None;
    }
    Some(BooksRoute::Item(
        segment.parse::<BookId>().ok().filter(|id| *id > 0),
    ))
}

/// API route handler
///
/// Dispatches to handler functions based on the matched route and method
pub async fn handle_books<B>(req: Request<B>, route: BooksRoute, state: &AppState) -> Response<Body>
where
    B: HttpBody<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let enable_cors = state.config.http.enable_cors;

    match (route, method) {
        (BooksRoute::Collection, Method::GET) => books::list_books(state).await,
        (BooksRoute::Collection, Method::POST) => books::create_book(req, state).await,
        (BooksRoute::Collection, Method::OPTIONS) => {
            http::build_options_response(COLLECTION_ALLOW, enable_cors)
        }
        (BooksRoute::Collection, other) => {
            http::build_405_response(other.as_str(), COLLECTION_ALLOW)
        }

        (BooksRoute::Item(id), Method::GET) => books::get_book(id, state).await,
        (BooksRoute::Item(id), Method::PUT) => books::update_book(req, id, state).await,
        (BooksRoute::Item(id), Method::DELETE) => books::delete_book(id, state).await,
        (BooksRoute::Item(_), Method::OPTIONS) => {
            http::build_options_response(ITEM_ALLOW, enable_cors)
        }
        (BooksRoute::Item(_), other) => http::build_405_response(other.as_str(), ITEM_ALLOW),
    }
}
