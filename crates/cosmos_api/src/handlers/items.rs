//! Item handlers.
//!
//! These handlers go through the `ItemStore` held in `AppState` and never
//! touch the database when the store is missing.

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

use cosmos_api_core::storage::StoreError;
use cosmos_api_core::Item;

use crate::{handlers::AppError, state::AppState};

/// List all items (GET /items).
pub async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<Item>>, AppError> {
    let store = state.store()?;

    let items = store
        .list_items()
        .await
        .context("Error retrieving items")?;

    Ok(Json(items))
}

/// Get a single item by id (GET /items/{id}).
///
/// The id doubles as the partition key for the point read.
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Item>, AppError> {
    let store = state.store()?;

    let item = store
        .get_item(&id)
        .await
        .context("Error retrieving item")?
        .ok_or(StoreError::NotFound { id })?;

    Ok(Json(item))
}

/// Create a new item (POST /items).
///
/// The body must be a JSON object with a string `id`. Returns the item as
/// stored, including server-assigned metadata.
pub async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let store = state.store()?;

    let Json(body) = payload
        .map_err(|e| StoreError::Validation(format!("Invalid JSON body: {}", e.body_text())))?;
    let item = Item::from_value(body).map_err(StoreError::from)?;

    let stored = store
        .create_item(&item)
        .await
        .context("Error creating item")?;

    tracing::info!(id = %stored.id(), "Created item");

    Ok((StatusCode::CREATED, Json(stored)))
}
