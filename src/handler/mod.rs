//! Request handler module
//!
//! Routes every request: the books API, health probes, the catalog page and
//! static assets.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
