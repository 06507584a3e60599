//! Cancellation token shared between the deadline timer and probe phases.
//!
//! The token is passed into every phase. When the deadline fires it does
//! not merely suppress late results: cancelling shuts down the registered
//! TCP stream, which makes any blocking handshake, auth, or exec call on
//! that stream error out promptly and release the transport.

use std::net::{Shutdown, TcpStream};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

/// Single-probe cancellation token.
#[derive(Clone)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

struct Inner {
    cancelled: AtomicBool,
    stream: Mutex<Option<TcpStream>>,
}

impl CancelToken {
    /// Creates an unfired token with no registered stream.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                stream: Mutex::new(None),
            }),
        }
    }

    /// Registers the probe's TCP stream so cancellation can abort it.
    ///
    /// If the token already fired the stream is shut down immediately, so
    /// a connect that races the deadline cannot leave a live socket behind.
    pub fn register_stream(&self, stream: TcpStream) {
        if self.is_cancelled() {
            let _ = stream.shutdown(Shutdown::Both);
            return;
        }

        let mut guard = match self.inner.stream.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        // Re-check under the lock: cancel() may have run between the flag
        // check and acquiring the guard.
        if self.is_cancelled() {
            let _ = stream.shutdown(Shutdown::Both);
        } else {
            *guard = Some(stream);
        }
    }

    /// Fires the token: marks it cancelled and forcibly shuts down any
    /// registered stream. Safe to call more than once.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);

        let mut guard = match self.inner.stream.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(stream) = guard.take() {
            debug!("cancellation fired, shutting down probe transport");
            let _ = stream.shutdown(Shutdown::Both);
        }
    }

    /// Returns true once the token has fired.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
