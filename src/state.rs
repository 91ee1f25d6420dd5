//! Shared application state for all routes. Built once at startup and never mutated.

use crate::config::EntityRegistry;
use crate::store::RecordStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<EntityRegistry>,
    pub store: Arc<dyn RecordStore>,
}

impl AppState {
    pub fn new(registry: EntityRegistry, store: Arc<dyn RecordStore>) -> Self {
        AppState {
            registry: Arc::new(registry),
            store,
        }
    }
}
