//! Probe outcome types.
//!
//! Exactly one [`ProbeOutcome`] is produced per request. The constructors
//! own the canonical user-facing messages, so the HTTP layer only has to
//! map a [`Classification`] to a status code.

use serde::{Deserialize, Serialize};

/// Classification of a finished probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    /// Caller input error; no network activity was attempted.
    ValidationFailed,
    /// The overall deadline elapsed before any phase resolved.
    TimedOut,
    /// Transport could not be established or authentication was rejected.
    ConnectFailed,
    /// Authenticated, but the verification command could not be issued.
    ExecFailed,
    /// The verification command ran and reported a non-zero exit status.
    CommandNonZero,
    /// The verification command ran and exited 0.
    Succeeded,
    /// A fault in the probe machinery itself, not a property of the
    /// remote host. Never produced by a phase or the deadline.
    InternalFault,
}

impl Classification {
    /// Returns a display string for the classification.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationFailed => "ValidationFailed",
            Self::TimedOut => "TimedOut",
            Self::ConnectFailed => "ConnectFailed",
            Self::ExecFailed => "ExecFailed",
            Self::CommandNonZero => "CommandNonZero",
            Self::Succeeded => "Succeeded",
            Self::InternalFault => "InternalFault",
        }
    }

    /// Returns true for the success classification.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Result of one reachability probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// Whether the probe succeeded end to end.
    pub succeeded: bool,
    /// Human-readable explanation of the outcome.
    pub message: String,
    /// Machine-readable classification.
    pub classification: Classification,
}

impl ProbeOutcome {
    fn new(classification: Classification, message: impl Into<String>) -> Self {
        Self {
            succeeded: classification.is_success(),
            message: message.into(),
            classification,
        }
    }

    /// Missing host or username; no transport was opened.
    #[must_use]
    pub fn validation_failed() -> Self {
        Self::new(
            Classification::ValidationFailed,
            "IP address and username are required",
        )
    }

    /// The overall deadline elapsed before resolution.
    #[must_use]
    pub fn timed_out() -> Self {
        Self::new(
            Classification::TimedOut,
            "Connection timed out. Please verify the IP address is reachable.",
        )
    }

    /// Transport or authentication error.
    #[must_use]
    pub fn connect_failed(error: &str) -> Self {
        Self::new(
            Classification::ConnectFailed,
            format!("Connection failed: {}", error),
        )
    }

    /// Command could not be issued after successful authentication.
    #[must_use]
    pub fn exec_failed(error: &str) -> Self {
        Self::new(
            Classification::ExecFailed,
            format!("Connected but failed to execute command: {}", error),
        )
    }

    /// Command completed with a non-zero exit status.
    #[must_use]
    pub fn command_non_zero(exit_status: i32, stderr: &str) -> Self {
        Self::new(
            Classification::CommandNonZero,
            format!("Command exited with code {}: {}", exit_status, stderr.trim()),
        )
    }

    /// Command completed with exit status 0.
    #[must_use]
    pub fn succeeded() -> Self {
        Self::new(Classification::Succeeded, "Connection successful")
    }

    /// The probe machinery faulted without producing a phase outcome.
    /// Deliberately shares its message with the HTTP panic envelope so
    /// callers see one generic fault surface.
    #[must_use]
    pub fn internal_fault() -> Self {
        Self::new(
            Classification::InternalFault,
            "Server error testing SSH connection",
        )
    }
}
