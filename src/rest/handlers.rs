//! REST API handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use tracing::debug;

use crate::probe::{Classification, ProbeRequest};

use super::state::ApiState;
use super::types::{HealthResponse, ProbeRequestBody, ProbeResponseBody};

/// Maps a probe classification to its HTTP status code.
fn status_for(classification: Classification) -> StatusCode {
    match classification {
        Classification::Succeeded => StatusCode::OK,
        Classification::TimedOut => StatusCode::REQUEST_TIMEOUT,
        Classification::ValidationFailed
        | Classification::ConnectFailed
        | Classification::ExecFailed
        | Classification::CommandNonZero => StatusCode::BAD_REQUEST,
        // Machinery faults share the panic envelope's status, not 400.
        Classification::InternalFault => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// POST /api/v1/ssh/test - Probe a host for SSH reachability.
pub async fn test_connection(
    State(state): State<Arc<ApiState>>,
    Json(body): Json<ProbeRequestBody>,
) -> (StatusCode, Json<ProbeResponseBody>) {
    let port = body.parsed_port();
    debug!(port, "received SSH test request");

    let mut req = ProbeRequest::new(
        body.ip_address.unwrap_or_default(),
        body.username.unwrap_or_default(),
    )
    .with_port(port)
    .with_deadlines(state.connect_deadline, state.overall_deadline);
    req.secret = body.password;

    let outcome = state.controller.probe(req).await;

    (
        status_for(outcome.classification),
        Json(ProbeResponseBody {
            success: outcome.succeeded,
            message: outcome.message,
        }),
    )
}

/// GET /api/v1/health - Liveness check.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
