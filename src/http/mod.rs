//! HTTP protocol layer module
//!
//! Response builders, cache headers and MIME detection, kept apart from the
//! catalog's business logic.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use response::{
    build_304_response, build_404_response, build_405_response, build_413_response,
    build_cached_response, build_health_response, build_html_response, build_options_response,
    error_response, json_response, Body,
};
