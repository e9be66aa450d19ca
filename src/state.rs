//! Application state shared across handlers

use crate::account::AccountStore;
use crate::config::AppConfig;

/// Application state shared across handlers and middleware
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Account persistence layer
    pub store: AccountStore,
}

impl AppState {
    pub fn new(config: AppConfig, store: AccountStore) -> Self {
        Self { config, store }
    }
}
