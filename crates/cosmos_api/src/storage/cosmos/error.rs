//! Cosmos DB error mapping.
//!
//! Maps REST failure responses and transport errors to `StoreError`.

use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;

use cosmos_api_core::storage::StoreError;

/// A non-success response from the Cosmos DB gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    pub status: StatusCode,
    pub code: Option<String>,
    pub message: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

impl ServiceError {
    /// Reads the status and error body out of a failed response.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => Self {
                status,
                code: body.code,
                message: body.message.unwrap_or(text),
            },
            Err(_) => Self {
                status,
                code: None,
                message: text,
            },
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.status == StatusCode::CONFLICT
    }

    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The gateway's messages can span several lines; keep the first.
        let message = self.message.lines().next().unwrap_or_default();
        match &self.code {
            Some(code) => write!(f, "{} ({code}): {message}", self.status.as_u16()),
            None => write!(f, "{}: {message}", self.status.as_u16()),
        }
    }
}

/// Map a failed database/container create to a provisioning error.
pub fn map_provisioning_error(err: ServiceError, resource: &str) -> StoreError {
    StoreError::Provisioning(format!("{resource}: {err}"))
}

/// Map a failed document create.
pub fn map_create_error(err: ServiceError, id: &str) -> StoreError {
    if err.is_conflict() {
        StoreError::AlreadyExists { id: id.to_string() }
    } else {
        StoreError::QueryFailed(err.to_string())
    }
}

/// Map a failed query or feed read.
pub fn map_query_error(err: ServiceError) -> StoreError {
    StoreError::QueryFailed(err.to_string())
}

/// Map a transport-level failure.
pub fn map_transport_error(err: reqwest::Error) -> StoreError {
    StoreError::ConnectionFailed(err.to_string())
}

/// Map an undecodable response body.
pub fn map_body_error(err: impl fmt::Display) -> StoreError {
    StoreError::Serialization(err.to_string())
}
