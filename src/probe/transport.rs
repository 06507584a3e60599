//! Transport seam between the probe controller and the SSH implementation.
//!
//! The controller only knows how to open an authenticated session, run the
//! verification command on it, and close it. The production implementation
//! is backed by the `ssh2` crate; tests substitute a scripted double.

use std::io::Read;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use super::cancel::CancelToken;
use super::credential::CredentialSource;

/// Errors produced below the outcome boundary. The controller recovers
/// every variant into a `ProbeOutcome`; none escape the probe.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Transport could not be established or authentication was rejected.
    #[error("{0}")]
    Connect(String),
    /// The session was live but the command could not be issued or
    /// collected.
    #[error("{0}")]
    Exec(String),
}

/// Output collected from the remote verification command.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    /// Remote exit status.
    pub exit_status: i32,
    /// Accumulated standard output.
    pub stdout: String,
    /// Accumulated standard error.
    pub stderr: String,
}

/// One live remote session, exclusively owned by its probe.
pub trait TransportSession: Send {
    /// Executes a command, collecting output until the remote process
    /// signals completion.
    fn exec(&mut self, command: &str) -> Result<ExecOutput, TransportError>;

    /// Closes the session. Safe to call more than once.
    fn close(&mut self);
}

/// Opens authenticated sessions. Implementations block; the controller
/// runs them on a blocking worker thread.
pub trait Transport: Send + Sync {
    /// Opens a transport to `host:port` and authenticates with exactly the
    /// given credential source. No retry chain: one method per probe.
    ///
    /// The TCP stream must be registered with `cancel` as soon as it
    /// exists, so the deadline can abort an in-flight handshake.
    fn connect(
        &self,
        host: &str,
        port: u16,
        username: &str,
        credential: &CredentialSource,
        connect_deadline: Duration,
        cancel: &CancelToken,
    ) -> Result<Box<dyn TransportSession>, TransportError>;
}

/// Converts a deadline to the millisecond form libssh2 expects, saturating
/// instead of wrapping for absurdly large configured values.
fn session_timeout_ms(deadline: Duration) -> u32 {
    u32::try_from(deadline.as_millis()).unwrap_or(u32::MAX)
}

/// Removes the per-call socket timeouts installed for the connect phase.
///
/// The clone shares its underlying socket with the stream handed to the
/// session, so clearing here clears for the session's reads and writes too.
fn clear_io_deadline(stream: &TcpStream) -> std::io::Result<()> {
    stream.set_read_timeout(None)?;
    stream.set_write_timeout(None)
}

/// Production transport backed by libssh2.
#[derive(Debug, Default)]
pub struct SshTransport;

impl SshTransport {
    /// Creates the ssh2-backed transport.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Transport for SshTransport {
    fn connect(
        &self,
        host: &str,
        port: u16,
        username: &str,
        credential: &CredentialSource,
        connect_deadline: Duration,
        cancel: &CancelToken,
    ) -> Result<Box<dyn TransportSession>, TransportError> {
        let addr = (host, port)
            .to_socket_addrs()
            .map_err(|e| TransportError::Connect(e.to_string()))?
            .next()
            .ok_or_else(|| {
                TransportError::Connect(format!("could not resolve host {}", host))
            })?;

        let stream = TcpStream::connect_timeout(&addr, connect_deadline)
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        // Bound every blocking read/write during connect, handshake, and
        // auth. Cleared once the session is authenticated; after that the
        // controller's deadline race is the only bound.
        let _ = stream.set_read_timeout(Some(connect_deadline));
        let _ = stream.set_write_timeout(Some(connect_deadline));

        // Hand a clone to the cancel token so the deadline can abort the
        // handshake or auth while they block. A second clone stays behind
        // to clear the socket timeouts after auth.
        let io_handle = match (stream.try_clone(), stream.try_clone()) {
            (Ok(abort_handle), Ok(io_handle)) => {
                cancel.register_stream(abort_handle);
                io_handle
            }
            (Err(e), _) | (_, Err(e)) => {
                return Err(TransportError::Connect(format!(
                    "could not prepare transport abort handle: {}",
                    e
                )));
            }
        };

        let mut session =
            ssh2::Session::new().map_err(|e| TransportError::Connect(e.to_string()))?;
        session.set_tcp_stream(stream);
        session.set_timeout(session_timeout_ms(connect_deadline));

        session
            .handshake()
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        debug!(host, port, "SSH handshake complete, authenticating");

        match credential {
            CredentialSource::StaticSecret(secret) => session
                .userauth_password(username, secret)
                .map_err(|e| TransportError::Connect(e.to_string()))?,
            CredentialSource::AgentDerived => session
                .userauth_agent(username)
                .map_err(|e| TransportError::Connect(e.to_string()))?,
        }

        if !session.authenticated() {
            return Err(TransportError::Connect(
                "authentication rejected by remote host".to_string(),
            ));
        }

        // Authenticated: the connect deadline has done its job. A slow
        // verification command must not trip the per-call timeouts, so
        // exec is bounded only by the overall deadline and cancellation.
        session.set_timeout(0);
        let _ = clear_io_deadline(&io_handle);

        Ok(Box::new(SshSession {
            session,
            closed: false,
        }))
    }
}

/// Live ssh2 session wrapper with a close-once guard.
struct SshSession {
    session: ssh2::Session,
    closed: bool,
}

impl TransportSession for SshSession {
    fn exec(&mut self, command: &str) -> Result<ExecOutput, TransportError> {
        let mut channel = self
            .session
            .channel_session()
            .map_err(|e| TransportError::Exec(e.to_string()))?;

        channel
            .exec(command)
            .map_err(|e| TransportError::Exec(e.to_string()))?;

        let mut stdout = String::new();
        channel
            .read_to_string(&mut stdout)
            .map_err(|e| TransportError::Exec(e.to_string()))?;

        let mut stderr = String::new();
        channel
            .stderr()
            .read_to_string(&mut stderr)
            .map_err(|e| TransportError::Exec(e.to_string()))?;

        channel
            .wait_close()
            .map_err(|e| TransportError::Exec(e.to_string()))?;

        let exit_status = channel
            .exit_status()
            .map_err(|e| TransportError::Exec(e.to_string()))?;

        Ok(ExecOutput {
            exit_status,
            stdout,
            stderr,
        })
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        let _ = self.session.disconnect(None, "probe complete", None);
    }
}

impl Drop for SshSession {
    fn drop(&mut self) {
        self.close();
    }
}
