//! HTTP response building module
//!
//! Provides builders for the status codes the catalog answers with.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};
use serde::Serialize;

use super::cache::CachePolicy;

/// Body type used by every response
pub type Body = Full<Bytes>;

/// Finish a builder, falling back to a bare response if a header was invalid
fn finish(builder: Builder, body: Bytes, label: &str) -> Response<Body> {
    builder.body(Full::new(body)).unwrap_or_else(|e| {
        crate::logger::log_error(&format!("Failed to build {label} response: {e}"));
        let mut fallback = Response::new(Full::new(Bytes::new()));
        *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        fallback
    })
}

/// Build JSON response
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Body> {
    match serde_json::to_vec(body) {
        Ok(json) => finish(
            Response::builder()
                .status(status)
                .header("Content-Type", "application/json")
                .header("Cache-Control", CachePolicy::NoStore.to_header_value()),
            Bytes::from(json),
            status.as_str(),
        ),
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

/// JSON error body: `{"error": "<message>"}`
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

pub fn error_response(status: StatusCode, message: &str) -> Response<Body> {
    let body = serde_json::to_vec(&ErrorBody { error: message }).unwrap_or_default();
    finish(
        Response::builder()
            .status(status)
            .header("Content-Type", "application/json"),
        Bytes::from(body),
        status.as_str(),
    )
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str) -> Response<Body> {
    finish(
        Response::builder()
            .status(StatusCode::NOT_MODIFIED)
            .header("ETag", etag)
            .header("Cache-Control", CachePolicy::default().to_header_value()),
        Bytes::new(),
        "304",
    )
}

/// Build 404 Not Found response (non-API paths)
pub fn build_404_response() -> Response<Body> {
    finish(
        Response::builder()
            .status(StatusCode::NOT_FOUND)
            .header("Content-Type", "text/plain"),
        Bytes::from("404 Not Found"),
        "404",
    )
}

/// Build 405 Method Not Allowed response with the route's `Allow` list
pub fn build_405_response(method: &str, allow: &str) -> Response<Body> {
    finish(
        Response::builder()
            .status(StatusCode::METHOD_NOT_ALLOWED)
            .header("Content-Type", "text/plain")
            .header("Allow", allow),
        Bytes::from(format!("Method {method} Not Allowed")),
        "405",
    )
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(allow: &str, enable_cors: bool) -> Response<Body> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Allow", allow);

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Methods", allow)
            .header("Access-Control-Allow-Headers", "Content-Type")
            .header("Access-Control-Max-Age", "86400");
    }

    finish(builder, Bytes::new(), "OPTIONS")
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Body> {
    error_response(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
}

/// Build health probe response
pub fn build_health_response(status: &str) -> Response<Body> {
    json_response(StatusCode::OK, &serde_json::json!({ "status": status }))
}

/// Build generic HTML response
pub fn build_html_response(content: &'static str, is_head: bool) -> Response<Body> {
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from_static(content.as_bytes())
    };

    finish(
        Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "text/html; charset=utf-8")
            .header("Content-Length", content.len())
            .header("Cache-Control", CachePolicy::NoCache.to_header_value()),
        body,
        "HTML",
    )
}

/// Build success response with cache control
pub fn build_cached_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    is_head: bool,
) -> Response<Body> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    finish(
        Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", content_type)
            .header("Content-Length", content_length)
            .header("ETag", etag)
            .header("Cache-Control", CachePolicy::default().to_header_value()),
        body,
        "200",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(resp: Response<Body>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_error_response_shape() {
        let resp = error_response(StatusCode::NOT_FOUND, "Book not found.");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()["Content-Type"], "application/json");
        assert_eq!(body_string(resp).await, r#"{"error":"Book not found."}"#);
    }

    #[tokio::test]
    async fn test_405_lists_allowed_methods() {
        let resp = build_405_response("PATCH", "GET, POST, OPTIONS");
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()["Allow"], "GET, POST, OPTIONS");
        assert_eq!(body_string(resp).await, "Method PATCH Not Allowed");
    }

    #[test]
    fn test_options_cors_headers() {
        let resp = build_options_response("GET, PUT, DELETE, OPTIONS", true);
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            resp.headers()["Access-Control-Allow-Methods"],
            "GET, PUT, DELETE, OPTIONS"
        );

        let resp = build_options_response("GET, POST, OPTIONS", false);
        assert!(resp.headers().get("Access-Control-Allow-Methods").is_none());
    }

    #[tokio::test]
    async fn test_html_head_has_length_but_no_body() {
        let resp = build_html_response("<p>hi</p>", true);
        assert_eq!(resp.headers()["Content-Length"], "9");
        assert!(body_string(resp).await.is_empty());
    }
}
