//! Static file serving module
//!
//! Serves cover art and other assets from the configured static directory.

use hyper::body::Bytes;
use hyper::Response;
use std::path::PathBuf;
use tokio::fs;

use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, Body};
use crate::logger;

/// Serve `ctx.path` from `static_dir`
pub async fn serve_static(ctx: &RequestContext<'_>, static_dir: &str) -> Response<Body> {
    match load_from_directory(static_dir, ctx.path).await {
        Some((content, content_type)) => build_static_file_response(
            content,
            content_type,
            ctx.if_none_match.as_deref(),
            ctx.is_head,
        ),
        None => http::build_404_response(),
    }
}

/// Resolve a request path inside `static_dir`, refusing anything that
/// escapes it after symlinks and `..` are resolved
async fn resolve(static_dir: &str, path: &str) -> Option<PathBuf> {
    let relative = path.trim_start_matches('/');
    if relative.is_empty() {
        return None;
    }

    let root = match fs::canonicalize(static_dir).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_debug(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    // File not found is common (404), no need to log at warning level
    let candidate = fs::canonicalize(root.join(relative)).await.ok()?;
    if !candidate.starts_with(&root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {path} -> {}",
            candidate.display()
        ));
        return None;
    }
    Some(candidate)
}

/// Load a static file and its content type
pub async fn load_from_directory(static_dir: &str, path: &str) -> Option<(Vec<u8>, &'static str)> {
    let file_path = resolve(static_dir, path).await?;
    if !fs::metadata(&file_path).await.ok()?.is_file() {
        return None;
    }

    let content = match fs::read(&file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            return None;
        }
    };

    Some((content, mime::content_type_for(&file_path)))
}

/// Build static file response with `ETag` support
fn build_static_file_response(
    data: Vec<u8>,
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Body> {
    let etag = cache::generate_etag(&data);

    // Check if client has cached version
    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    http::build_cached_response(Bytes::from(data), content_type, &etag, is_head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::StatusCode;

    fn ctx<'a>(path: &'a str, if_none_match: Option<String>) -> RequestContext<'a> {
        RequestContext {
            path,
            is_head: false,
            if_none_match,
        }
    }

    fn static_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("images")).unwrap();
        std::fs::write(dir.path().join("images/cover.jpg"), b"jpeg bytes").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_serves_file_with_etag() {
        let dir = static_dir();
        let root = dir.path().to_str().unwrap();

        let resp = serve_static(&ctx("/images/cover.jpg", None), root).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["Content-Type"], "image/jpeg");
        let etag = resp.headers()["ETag"].to_str().unwrap().to_string();

        let resp = serve_static(&ctx("/images/cover.jpg", Some(etag)), root).await;
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_missing_file_and_directory() {
        let dir = static_dir();
        let root = dir.path().to_str().unwrap();

        let resp = serve_static(&ctx("/images/none.jpg", None), root).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = serve_static(&ctx("/images", None), root).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_traversal_blocked() {
        let outer = tempfile::tempdir().unwrap();
        std::fs::write(outer.path().join("secret.txt"), b"secret").unwrap();
        let public = outer.path().join("public");
        std::fs::create_dir(&public).unwrap();

        let resp = serve_static(&ctx("/../secret.txt", None), public.to_str().unwrap()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_static_dir() {
        let resp = serve_static(&ctx("/images/cover.jpg", None), "/nonexistent/public").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
