//! REST API route definitions.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use super::{handlers, state::ApiState};

/// Creates the REST API router with all routes.
pub fn create_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api/v1/ssh/test", post(handlers::test_connection))
        .route("/api/v1/health", get(handlers::health))
        .with_state(state)
}
