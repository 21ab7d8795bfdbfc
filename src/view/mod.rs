//! Catalog page
//!
//! A single HTML document with inline script. It lists the books as cards
//! and drives create/update/delete through the `/books` API, changing its
//! local list only after the server confirms.

use hyper::Response;

use crate::http::{self, Body};

const INDEX_HTML: &str = include_str!("index.html");

/// Paths that serve the page
pub fn is_page_path(path: &str) -> bool {
    matches!(path, "/" | "/index.html")
}

/// Serve the catalog page
pub fn serve_page(is_head: bool) -> Response<Body> {
    http::build_html_response(INDEX_HTML, is_head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_page_talks_to_books_api() {
        let resp = serve_page(false);
        assert_eq!(resp.headers()["Content-Type"], "text/html; charset=utf-8");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("fetch(path, init)"));
        assert!(html.contains("\"/books/\" + id"));
        assert!(html.contains("Download PDF"));
    }

    /// Every write to the book list sits in a `.then` callback of an api call,
    /// ahead of that call's `.catch`
    #[test]
    fn test_list_changes_only_after_server_confirms() {
        let script = INDEX_HTML
            .split("<script>")
            .nth(1)
            .and_then(|s| s.split("</script>").next())
            .unwrap();

        let mut writers = 0;
        for function in script.split("\n    function ").skip(1) {
            let name = function.split('(').next().unwrap();
            if !function.contains("state.books =") {
                continue;
            }
            writers += 1;

            let call_at = function
                .find("api(")
                .unwrap_or_else(|| panic!("{name} writes the list without an api call"));
            let then_at = function
                .find(".then(function")
                .unwrap_or_else(|| panic!("{name} has no .then callback"));
            let catch_at = function
                .find(".catch(function")
                .unwrap_or_else(|| panic!("{name} has no .catch callback"));

            assert!(call_at < then_at, "{name}");
            for (at, _) in function.match_indices("state.books =") {
                assert!(then_at < at && at < catch_at, "{name} writes the list outside .then");
            }
        }
        // fetchBooks, updateBook, deleteBook, addBook
        assert_eq!(writers, 4);
    }

    #[test]
    fn test_page_paths() {
        assert!(is_page_path("/"));
        assert!(is_page_path("/index.html"));
        assert!(!is_page_path("/books"));
    }
}
