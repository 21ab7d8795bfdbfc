//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: body size check, route matching,
//! dispatch, common response headers and access logging.

use crate::api;
use crate::config::{AppState, HttpConfig};
use crate::handler::static_files;
use crate::http::{self, Body};
use crate::logger::{self, AccessLogEntry};
use crate::view;
use hyper::body::{Body as HttpBody, Bytes};
use hyper::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, SERVER};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Methods served on page, health and static paths
const STATIC_ALLOW: &str = "GET, HEAD, OPTIONS";

/// Request context for the non-API paths
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Body>, Infallible>
where
    B: HttpBody<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let entry = state
        .access_log_enabled()
        .then(|| access_entry(&req, peer_addr));

    let mut response = route_request(req, &state).await;
    apply_common_headers(&mut response, &state.config.http);

    if let Some(mut entry) = entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

fn access_entry<B>(req: &Request<B>, peer_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry
}

/// Dispatch by path: books API, health probes, the page, then static files
async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Body>
where
    B: HttpBody<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        return resp;
    }

    if let Some(route) = api::match_route(req.uri().path()) {
        return api::handle_books(req, route, state).await;
    }

    let method = req.method();
    let is_head = method == Method::HEAD;
    if let Some(resp) = check_http_method(method, state.config.http.enable_cors) {
        return resp;
    }

    let ctx = RequestContext {
        path: req.uri().path(),
        is_head,
        if_none_match: req
            .headers()
            .get("if-none-match")
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string),
    };

    let health = &state.config.health;
    if health.enabled && (ctx.path == health.liveness_path || ctx.path == health.readiness_path) {
        return http::build_health_response("ok");
    }

    if view::is_page_path(ctx.path) {
        return view::serve_page(ctx.is_head);
    }

    static_files::serve_static(&ctx, &state.config.catalog.static_dir).await
}

/// Only GET/HEAD reach the page and static files
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Body>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(STATIC_ALLOW, enable_cors)),
        _ => {
            logger::log_debug(&format!("Method not allowed: {method}"));
            Some(http::build_405_response(method.as_str(), STATIC_ALLOW))
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Body>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            // a bad Content-Length is left to hyper; the body read is capped anyway
            _ => None,
        },
    )
}

fn apply_common_headers(response: &mut Response<Body>, http_config: &HttpConfig) {
    let headers = response.headers_mut();
    match HeaderValue::from_str(&http_config.server_name) {
        Ok(value) => {
            headers.insert(SERVER, value);
        }
        Err(e) => logger::log_debug(&format!("Invalid server_name header: {e}")),
    }
    if http_config.enable_cors {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{build_store, BookStore};
    use crate::config::Config;
    use http_body_util::{BodyExt, Full};
    use hyper::StatusCode;

    fn seeded_state() -> Arc<AppState> {
        let mut config = Config::load_from("/nonexistent/book-catalog").unwrap();
        config.logging.access_log = false;
        let store = build_store(&config.catalog).unwrap();
        Arc::new(AppState::new(config, store))
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    async fn call(state: &Arc<AppState>, method: Method, path: &str) -> Response<Body> {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .body(Full::new(Bytes::new()))
            .unwrap();
        handle_request(req, Arc::clone(state), peer()).await.unwrap()
    }

    #[tokio::test]
    async fn test_books_listing_is_seeded() {
        let state = seeded_state();
        let resp = call(&state, Method::GET, "/books").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["Server"], "book-catalog");

        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let books: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let titles: Vec<&str> = books
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["title"].as_str().unwrap())
            .collect();
        assert_eq!(
            titles,
            vec![
                "Sahih al-Bukhari",
                "Sahih Muslim",
                "Tafseer Ibn Kathir",
                "Al-Muwatta",
                "Riyad as-Salihin"
            ]
        );
    }

    #[tokio::test]
    async fn test_page_and_health() {
        let state = seeded_state();

        let resp = call(&state, Method::GET, "/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["Content-Type"], "text/html; charset=utf-8");

        let resp = call(&state, Method::GET, "/healthz").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let resp = call(&state, Method::GET, "/readyz").await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_non_get_on_page_is_405() {
        let state = seeded_state();
        let resp = call(&state, Method::DELETE, "/").await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()["Allow"], STATIC_ALLOW);
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let state = seeded_state();
        let resp = call(&state, Method::GET, "/books/1/pages").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_oversized_content_length_rejected() {
        let state = seeded_state();
        let req = Request::builder()
            .method(Method::POST)
            .uri("/books")
            .header("content-length", "999999999")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let resp = handle_request(req, Arc::clone(&state), peer()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(state.store.len().await, 5);
    }

    #[tokio::test]
    async fn test_cors_header_when_enabled() {
        let mut config = Config::load_from("/nonexistent/book-catalog").unwrap();
        config.logging.access_log = false;
        config.http.enable_cors = true;
        let state = Arc::new(AppState::new(config, BookStore::new()));

        let resp = call(&state, Method::GET, "/books").await;
        assert_eq!(resp.headers()["Access-Control-Allow-Origin"], "*");
    }
}
