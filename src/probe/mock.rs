//! Scripted transport double for testing probe logic without servers.
//!
//! The mock counts opens, closes, and execs so tests can verify that a
//! validation failure never touches the transport and that every opened
//! session is released on every exit path. Delays are slept in small
//! slices that observe the cancel token, mirroring how cancellation shuts
//! down a real stream mid-call.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use super::cancel::CancelToken;
use super::credential::CredentialSource;
use super::transport::{ExecOutput, Transport, TransportError, TransportSession};

/// Scripted behaviour for a mock probe target.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Connect fails after the delay (e.g. refused, auth rejected).
    ConnectError {
        /// Message returned from the connect phase.
        message: String,
        /// Time spent before failing.
        delay: Duration,
    },
    /// Connect succeeds; the verification command completes as scripted.
    Exec {
        /// Time spent establishing the session.
        connect_delay: Duration,
        /// Time the remote command takes to complete.
        exec_delay: Duration,
        /// Remote exit status.
        exit_status: i32,
        /// Remote standard output.
        stdout: String,
        /// Remote standard error.
        stderr: String,
    },
    /// Connect succeeds but the command cannot be issued.
    ExecError {
        /// Message returned from the exec phase.
        message: String,
    },
}

impl MockBehavior {
    /// Connect succeeds instantly, command exits 0.
    #[must_use]
    pub fn success() -> Self {
        Self::Exec {
            connect_delay: Duration::ZERO,
            exec_delay: Duration::ZERO,
            exit_status: 0,
            stdout: "reachprobe-verify-ok\n".to_string(),
            stderr: String::new(),
        }
    }

    /// Connect succeeds instantly, command exits non-zero with stderr.
    #[must_use]
    pub fn non_zero(exit_status: i32, stderr: impl Into<String>) -> Self {
        Self::Exec {
            connect_delay: Duration::ZERO,
            exec_delay: Duration::ZERO,
            exit_status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Connect is refused immediately.
    #[must_use]
    pub fn refused() -> Self {
        Self::ConnectError {
            message: "connection refused".to_string(),
            delay: Duration::ZERO,
        }
    }
}

/// Counters observable from tests.
#[derive(Debug, Default)]
pub struct MockCounters {
    opened: AtomicUsize,
    closed: AtomicUsize,
    execs: AtomicUsize,
    last_port: AtomicUsize,
}

impl MockCounters {
    /// Number of sessions opened.
    #[must_use]
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Number of sessions closed.
    #[must_use]
    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    /// Number of exec calls issued.
    #[must_use]
    pub fn execs(&self) -> usize {
        self.execs.load(Ordering::SeqCst)
    }

    /// Port used by the most recent connect.
    #[must_use]
    pub fn last_port(&self) -> u16 {
        self.last_port.load(Ordering::SeqCst) as u16
    }
}

/// In-memory transport with scripted behaviour.
pub struct MockTransport {
    behavior: MockBehavior,
    counters: Arc<MockCounters>,
}

impl MockTransport {
    /// Creates a mock transport with the given behaviour.
    #[must_use]
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            counters: Arc::new(MockCounters::default()),
        }
    }

    /// Returns the shared counters.
    #[must_use]
    pub fn counters(&self) -> Arc<MockCounters> {
        Arc::clone(&self.counters)
    }
}

/// Sleeps in 1ms slices, returning early once the token fires.
fn interruptible_sleep(total: Duration, cancel: &CancelToken) -> bool {
    let start = Instant::now();
    while start.elapsed() < total {
        if cancel.is_cancelled() {
            return false;
        }
        thread::sleep(Duration::from_millis(1));
    }
    !cancel.is_cancelled()
}

impl Transport for MockTransport {
    fn connect(
        &self,
        _host: &str,
        port: u16,
        _username: &str,
        _credential: &CredentialSource,
        _connect_deadline: Duration,
        cancel: &CancelToken,
    ) -> Result<Box<dyn TransportSession>, TransportError> {
        self.counters.last_port.store(usize::from(port), Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::ConnectError { message, delay } => {
                interruptible_sleep(*delay, cancel);
                Err(TransportError::Connect(message.clone()))
            }
            MockBehavior::Exec { connect_delay, .. } => {
                if !interruptible_sleep(*connect_delay, cancel) {
                    return Err(TransportError::Connect(
                        "connection aborted".to_string(),
                    ));
                }
                self.counters.opened.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(MockSession {
                    behavior: self.behavior.clone(),
                    counters: Arc::clone(&self.counters),
                    cancel: cancel.clone(),
                    closed: false,
                }))
            }
            MockBehavior::ExecError { .. } => {
                self.counters.opened.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(MockSession {
                    behavior: self.behavior.clone(),
                    counters: Arc::clone(&self.counters),
                    cancel: cancel.clone(),
                    closed: false,
                }))
            }
        }
    }
}

struct MockSession {
    behavior: MockBehavior,
    counters: Arc<MockCounters>,
    cancel: CancelToken,
    closed: bool,
}

impl TransportSession for MockSession {
    fn exec(&mut self, _command: &str) -> Result<ExecOutput, TransportError> {
        self.counters.execs.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::Exec {
                exec_delay,
                exit_status,
                stdout,
                stderr,
                ..
            } => {
                if !interruptible_sleep(*exec_delay, &self.cancel) {
                    return Err(TransportError::Exec("session aborted".to_string()));
                }
                Ok(ExecOutput {
                    exit_status: *exit_status,
                    stdout: stdout.clone(),
                    stderr: stderr.clone(),
                })
            }
            MockBehavior::ExecError { message } => {
                Err(TransportError::Exec(message.clone()))
            }
            MockBehavior::ConnectError { .. } => {
                Err(TransportError::Exec("session never opened".to_string()))
            }
        }
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
    }
}

impl Drop for MockSession {
    fn drop(&mut self) {
        self.close();
    }
}
