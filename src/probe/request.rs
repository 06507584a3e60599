//! Probe request data structure.
//!
//! A [`ProbeRequest`] describes one bounded reachability check: which host
//! to contact, how to authenticate, and the deadlines bounding the attempt.
//! Requests are immutable once handed to the controller.

use std::fmt;
use std::time::Duration;

/// Default SSH port.
pub const DEFAULT_PORT: u16 = 22;

/// Default bound on establishing an authenticated session.
pub const DEFAULT_CONNECT_DEADLINE: Duration = Duration::from_secs(8);

/// Default bound on the entire probe, command execution included.
pub const DEFAULT_OVERALL_DEADLINE: Duration = Duration::from_secs(10);

/// Input for one reachability probe.
#[derive(Clone)]
pub struct ProbeRequest {
    /// Hostname or IP address to probe.
    pub host: String,
    /// SSH port (default: 22).
    pub port: u16,
    /// Username to authenticate as.
    pub username: String,
    /// Password, if one was supplied. `None` selects agent authentication.
    pub secret: Option<String>,
    /// Bound on establishing an authenticated session.
    pub connect_deadline: Duration,
    /// Bound on the entire probe. Clamped to at least `connect_deadline`.
    pub overall_deadline: Duration,
}

impl ProbeRequest {
    /// Creates a request with default port and deadlines.
    #[must_use]
    pub fn new(host: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            username: username.into(),
            secret: None,
            connect_deadline: DEFAULT_CONNECT_DEADLINE,
            overall_deadline: DEFAULT_OVERALL_DEADLINE,
        }
    }

    /// Sets the port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the password. An explicitly empty string is still a password;
    /// only a request that never carried one falls back to agent auth.
    #[must_use]
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Sets both deadlines.
    #[must_use]
    pub fn with_deadlines(mut self, connect: Duration, overall: Duration) -> Self {
        self.connect_deadline = connect;
        self.overall_deadline = overall;
        self
    }

    /// Returns true if host and username are present.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.host.trim().is_empty() && !self.username.trim().is_empty()
    }

    /// The overall deadline, never shorter than the connect deadline.
    #[must_use]
    pub fn effective_overall_deadline(&self) -> Duration {
        self.overall_deadline.max(self.connect_deadline)
    }
}

// The secret must never leak into logs or panic messages.
impl fmt::Debug for ProbeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeRequest")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("secret", &self.secret.as_ref().map(|_| "***"))
            .field("connect_deadline", &self.connect_deadline)
            .field("overall_deadline", &self.overall_deadline)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let req = ProbeRequest::new("192.168.1.50", "admin");

        assert_eq!(req.port, 22);
        assert!(req.secret.is_none());
        assert_eq!(req.connect_deadline, Duration::from_secs(8));
        assert_eq!(req.overall_deadline, Duration::from_secs(10));
        assert!(req.is_valid());
    }

    #[test]
    fn test_request_validation() {
        assert!(!ProbeRequest::new("", "admin").is_valid());
        assert!(!ProbeRequest::new("host", "").is_valid());
        assert!(!ProbeRequest::new("  ", "admin").is_valid());
    }

    #[test]
    fn test_overall_deadline_clamped_to_connect() {
        let req = ProbeRequest::new("host", "user")
            .with_deadlines(Duration::from_secs(8), Duration::from_secs(2));

        assert_eq!(req.effective_overall_deadline(), Duration::from_secs(8));
    }

    #[test]
    fn test_empty_secret_is_still_a_secret() {
        let req = ProbeRequest::new("host", "user").with_secret("");
        assert_eq!(req.secret.as_deref(), Some(""));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let req = ProbeRequest::new("host", "user").with_secret("hunter2");
        let debug = format!("{:?}", req);

        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("***"));
    }
}
