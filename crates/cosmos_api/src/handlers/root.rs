//! Root route handler.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// Handler for GET /
///
/// Static service identity; does not touch the database.
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "Cosmos DB API is running",
        "database": state.database_name,
        "container": state.container_name,
    }))
}
