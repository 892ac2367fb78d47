//! Shared state for HTTP handlers.

use placescout_core::AppConfig;
use placescout_store::ResultStore;
use std::sync::Arc;

/// Configuration and result store shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: ResultStore,
}

impl AppState {
    /// State whose store writes into the configured output directory.
    pub fn new(config: AppConfig) -> Self {
        let store = ResultStore::new(config.output.dir.clone());
        Self {
            config: Arc::new(config),
            store,
        }
    }
}
