//! Health check endpoint.
//!
//! - `/health` - runs the item count query against the container
//!
//! The check never fails at the HTTP level: it answers 200 and carries the
//! verdict in the `status` field of the body.

use axum::{extract::State, Json};

use cosmos_api_core::HealthReport;

use crate::state::AppState;

/// GET /health - Readiness probe backed by a count query.
#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(evaluate(&state).await)
}

async fn evaluate(state: &AppState) -> HealthReport {
    let Ok(store) = state.store() else {
        return HealthReport::unhealthy("Cosmos DB not properly initialized");
    };

    match store.count_items().await {
        Ok(item_count) => HealthReport::Healthy {
            database: state.database_name.clone(),
            container: state.container_name.clone(),
            item_count,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            HealthReport::unhealthy(e.to_string())
        }
    }
}
