//! Pure functions for mapping store errors to HTTP status codes.

use super::StoreError;

/// Maps a [`StoreError`] to an HTTP status code.
///
/// - `NotFound` -> 404 (Not Found)
/// - `Validation` -> 400 (Bad Request)
/// - everything else -> 500 (Internal Server Error)
///
/// A duplicate `id` on create is an insert failure like any other and maps
/// to 500.
///
/// # Examples
///
/// ```
/// use cosmos_api_core::storage::{StoreError, store_error_to_status_code};
///
/// let error = StoreError::NotFound { id: "abc-123".to_string() };
/// assert_eq!(store_error_to_status_code(&error), 404);
/// ```
pub fn store_error_to_status_code(error: &StoreError) -> u16 {
    match error {
        StoreError::NotFound { .. } => 404,
        StoreError::Validation(_) => 400,
        StoreError::AlreadyExists { .. }
        | StoreError::Provisioning(_)
        | StoreError::NotInitialized
        | StoreError::ConnectionFailed(_)
        | StoreError::QueryFailed(_)
        | StoreError::Serialization(_) => 500,
    }
}
