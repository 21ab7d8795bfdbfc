// Application state module
// Everything a request handler needs, shared behind one Arc

use crate::catalog::BookStore;

use super::types::Config;

/// Application state
pub struct AppState {
    pub config: Config,
    /// The single book store for this process
    pub store: BookStore,
}

impl AppState {
    pub const fn new(config: Config, store: BookStore) -> Self {
        Self { config, store }
    }

    pub const fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }
}
