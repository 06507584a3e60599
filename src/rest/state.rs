//! Shared state for the REST API server.

use std::time::Duration;

use crate::probe::{DEFAULT_CONNECT_DEADLINE, DEFAULT_OVERALL_DEADLINE, ProbeController};

/// Shared state for the REST API server.
pub struct ApiState {
    /// Probe controller; owns the transport, cheap to share.
    pub controller: ProbeController,
    /// Deadline applied to the connect phase of every probe.
    pub connect_deadline: Duration,
    /// Deadline applied to the probe as a whole.
    pub overall_deadline: Duration,
}

impl ApiState {
    /// Creates API state with explicit deadlines.
    #[must_use]
    pub fn new(
        controller: ProbeController,
        connect_deadline: Duration,
        overall_deadline: Duration,
    ) -> Self {
        Self {
            controller,
            connect_deadline,
            overall_deadline,
        }
    }

    /// Creates API state with the default probe deadlines.
    #[must_use]
    pub fn with_defaults(controller: ProbeController) -> Self {
        Self::new(
            controller,
            DEFAULT_CONNECT_DEADLINE,
            DEFAULT_OVERALL_DEADLINE,
        )
    }
}
