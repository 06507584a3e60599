//! HTTP boundary exposing the reachability probe.
//!
//! Routes:
//! - `POST /api/v1/ssh/test` — run one probe, status code per outcome
//! - `GET /api/v1/health` — liveness check

pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod types;

pub use router::create_router;
pub use server::{DEFAULT_PORT, RestApiServer};
pub use state::ApiState;
pub use types::{HealthResponse, ProbeRequestBody, ProbeResponseBody};
