use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::{
    handlers::{
        health::health,
        items::{create_item, get_item, list_items},
        root::root,
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/items", get(list_items).post(create_item))
        .route("/items/{id}", get(get_item))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
