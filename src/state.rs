//! Shared application state for request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::SharedStore;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Built once at startup and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: SharedStore,
}

impl AppState {
    /// Creates a new application state from the given configuration and store.
    pub fn new(config: AppConfig, store: SharedStore) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}
