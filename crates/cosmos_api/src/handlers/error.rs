use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use cosmos_api_core::storage::{store_error_to_status_code, StoreError};

/// Handler error type that wraps `anyhow::Error`.
///
/// The status code comes from the `StoreError` inside the chain, if any;
/// anything else is a 500. The body is `{"detail": "<message>"}`.
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn status(&self) -> StatusCode {
        self.0
            .downcast_ref::<StoreError>()
            .map(store_error_to_status_code)
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = format!("{:#}", self.0);

        if status.is_server_error() {
            tracing::error!(status = %status, error = %detail, "Request failed");
        } else {
            tracing::warn!(status = %status, error = %detail, "Request rejected");
        }

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
