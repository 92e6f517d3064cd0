//! Application state shared with every request handler.

use std::sync::Arc;

use cosmos_api_core::storage::{ItemStore, StoreError, CONTAINER_NAME, DATABASE_NAME};

/// Shared application state.
///
/// Built once after bootstrap and cloned into each handler. The store handle
/// is never replaced after startup, so no locking is needed around it.
#[derive(Clone)]
pub struct AppState {
    /// Handle to the provisioned container. `None` means bootstrap never
    /// produced one; handlers report that instead of touching the database.
    store: Option<Arc<dyn ItemStore>>,
    pub database_name: String,
    pub container_name: String,
}

impl AppState {
    /// Creates state around an initialized store.
    pub fn new(
        store: Arc<dyn ItemStore>,
        database_name: impl Into<String>,
        container_name: impl Into<String>,
    ) -> Self {
        Self {
            store: Some(store),
            database_name: database_name.into(),
            container_name: container_name.into(),
        }
    }

    /// Creates state without a store handle.
    pub fn uninitialized() -> Self {
        Self {
            store: None,
            database_name: DATABASE_NAME.to_string(),
            container_name: CONTAINER_NAME.to_string(),
        }
    }

    /// Returns the store handle, or `StoreError::NotInitialized`.
    pub fn store(&self) -> Result<&Arc<dyn ItemStore>, StoreError> {
        self.store.as_ref().ok_or(StoreError::NotInitialized)
    }
}
