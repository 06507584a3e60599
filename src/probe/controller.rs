//! Probe controller: drives one reachability check to exactly one outcome.
//!
//! The controller owns the full lifecycle of one probe. The blocking SSH
//! phases (connect, verify, collect) run on a worker thread while a
//! deadline task races them; whichever resolves first takes the single
//! oneshot sender out of the latch and delivers the outcome. Every later
//! event finds the sender gone and performs only internal cleanup, so a
//! probe can never resolve twice and the transport is released on every
//! exit path.

use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::cancel::CancelToken;
use super::credential::CredentialSource;
use super::outcome::ProbeOutcome;
use super::request::ProbeRequest;
use super::transport::{SshTransport, Transport, TransportError};

/// Fixed, side-effect-free verification command: a literal echo of a
/// marker string, used solely to confirm command execution capability.
pub const VERIFY_COMMAND: &str = "echo reachprobe-verify-ok";

/// Single-fire resolution latch.
///
/// Holds the probe's one oneshot sender; the first event to resolve takes
/// it and sends. The take-and-send is guarded by a mutex, so concurrent
/// losers observe `None` and back off.
#[derive(Clone)]
struct ResolveLatch {
    tx: Arc<Mutex<Option<oneshot::Sender<ProbeOutcome>>>>,
}

impl ResolveLatch {
    fn new() -> (Self, oneshot::Receiver<ProbeOutcome>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                tx: Arc::new(Mutex::new(Some(tx))),
            },
            rx,
        )
    }

    /// Attempts to resolve the probe. Returns true if this call performed
    /// the resolution, false if another event already won.
    fn resolve(&self, outcome: ProbeOutcome) -> bool {
        let mut guard = match self.tx.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        match guard.take() {
            // The receiver only disappears if the caller went away; the
            // outcome has nowhere to go either way.
            Some(tx) => tx.send(outcome).is_ok(),
            None => false,
        }
    }
}

/// Controller for remote reachability probes.
///
/// Cheap to share: holds only the transport. Concurrent probes own their
/// own session, latch, and cancel token.
pub struct ProbeController {
    transport: Arc<dyn Transport>,
}

impl ProbeController {
    /// Creates a controller backed by the production SSH transport.
    #[must_use]
    pub fn new() -> Self {
        Self::with_transport(Arc::new(SshTransport::new()))
    }

    /// Creates a controller with a custom transport (used by tests).
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Runs one probe to its single outcome.
    ///
    /// Validation happens synchronously before any network activity; an
    /// invalid request resolves immediately without starting the deadline
    /// timer or opening a transport.
    pub async fn probe(&self, req: ProbeRequest) -> ProbeOutcome {
        let probe_id = Uuid::new_v4();

        if !req.is_valid() {
            warn!(%probe_id, "probe rejected: missing host or username");
            return ProbeOutcome::validation_failed();
        }

        let credential = CredentialSource::from_secret(req.secret.clone());
        let overall_deadline = req.effective_overall_deadline();

        info!(
            %probe_id,
            host = %req.host,
            port = req.port,
            auth = credential.method_name(),
            "probe started"
        );

        let (latch, rx) = ResolveLatch::new();
        let cancel = CancelToken::new();

        // Deadline task: on firing, claim the resolution first, then abort
        // the transport. Losing the claim means a phase already resolved.
        let deadline_task = tokio::spawn({
            let latch = latch.clone();
            let cancel = cancel.clone();
            async move {
                tokio::time::sleep(overall_deadline).await;
                if latch.resolve(ProbeOutcome::timed_out()) {
                    warn!(%probe_id, "probe deadline elapsed, aborting transport");
                    cancel.cancel();
                }
            }
        });

        // Phase worker: connect, verify, collect on a blocking thread.
        // If the deadline already resolved, the outcome is discarded and
        // only the session cleanup inside run_phases remains visible.
        let worker = {
            let transport = Arc::clone(&self.transport);
            let latch = latch.clone();
            let cancel = cancel.clone();
            let req = req.clone();
            tokio::task::spawn_blocking(move || {
                let outcome = run_phases(&*transport, &req, &credential, &cancel, probe_id);
                if !latch.resolve(outcome) {
                    debug!(%probe_id, "phase result discarded, probe already resolved");
                }
            })
        };

        let outcome = match rx.await {
            Ok(outcome) => outcome,
            // Both senders dropped without resolving: the worker panicked
            // before the deadline armed itself. A machinery fault, not a
            // statement about the remote host.
            Err(_) => {
                error!(%probe_id, "probe worker vanished without resolving");
                ProbeOutcome::internal_fault()
            }
        };

        deadline_task.abort();
        drop(worker);

        info!(
            %probe_id,
            classification = outcome.classification.as_str(),
            "probe resolved"
        );
        outcome
    }
}

impl Default for ProbeController {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the ordered phases of one probe: Connect -> Verify -> Collect.
///
/// Blocking. The session is closed on every path out of this function;
/// when the deadline has already shut the stream down, the in-flight call
/// errors out and the error path releases the session like any other.
fn run_phases(
    transport: &dyn Transport,
    req: &ProbeRequest,
    credential: &CredentialSource,
    cancel: &CancelToken,
    probe_id: Uuid,
) -> ProbeOutcome {
    debug!(%probe_id, host = %req.host, port = req.port, "connecting");

    let mut session = match transport.connect(
        &req.host,
        req.port,
        &req.username,
        credential,
        req.connect_deadline,
        cancel,
    ) {
        Ok(session) => session,
        Err(e) => {
            debug!(%probe_id, error = %e, "connect phase failed");
            return ProbeOutcome::connect_failed(&e.to_string());
        }
    };

    debug!(%probe_id, "authenticated, executing verification command");

    let outcome = match session.exec(VERIFY_COMMAND) {
        Ok(output) if output.exit_status == 0 => ProbeOutcome::succeeded(),
        Ok(output) => ProbeOutcome::command_non_zero(output.exit_status, &output.stderr),
        Err(TransportError::Exec(msg)) | Err(TransportError::Connect(msg)) => {
            debug!(%probe_id, error = %msg, "verify phase failed");
            ProbeOutcome::exec_failed(&msg)
        }
    };

    session.close();
    outcome
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::probe::mock::{MockBehavior, MockTransport};

    fn controller(behavior: MockBehavior) -> (ProbeController, Arc<crate::probe::mock::MockCounters>) {
        let transport = MockTransport::new(behavior);
        let counters = transport.counters();
        (ProbeController::with_transport(Arc::new(transport)), counters)
    }

    #[tokio::test]
    async fn test_latch_resolves_once() {
        let (latch, rx) = ResolveLatch::new();

        assert!(latch.resolve(ProbeOutcome::succeeded()));
        assert!(!latch.resolve(ProbeOutcome::timed_out()));

        let outcome = rx.await.unwrap();
        assert!(outcome.succeeded);
    }

    #[tokio::test]
    async fn test_validation_skips_transport() {
        let (controller, counters) = controller(MockBehavior::success());

        let outcome = controller.probe(ProbeRequest::new("", "admin")).await;

        assert_eq!(
            outcome.classification,
            crate::probe::Classification::ValidationFailed
        );
        assert_eq!(counters.opened(), 0);
        assert_eq!(counters.execs(), 0);
    }

    #[tokio::test]
    async fn test_successful_probe() {
        let (controller, counters) = controller(MockBehavior::success());

        let outcome = controller
            .probe(ProbeRequest::new("10.0.0.5", "admin"))
            .await;

        assert!(outcome.succeeded);
        assert_eq!(outcome.message, "Connection successful");
        assert_eq!(counters.opened(), 1);
        assert_eq!(counters.closed(), 1);
    }

    #[tokio::test]
    async fn test_deadline_preempts_slow_connect() {
        let (controller, _counters) = controller(MockBehavior::Exec {
            connect_delay: Duration::from_millis(500),
            exec_delay: Duration::ZERO,
            exit_status: 0,
            stdout: String::new(),
            stderr: String::new(),
        });

        let req = ProbeRequest::new("10.0.0.5", "admin").with_deadlines(
            Duration::from_millis(40),
            Duration::from_millis(40),
        );

        let outcome = controller.probe(req).await;

        assert_eq!(
            outcome.classification,
            crate::probe::Classification::TimedOut
        );
    }
}
