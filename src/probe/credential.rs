//! Credential source selection.
//!
//! Authentication method selection is a precondition of the probe, not a
//! retry chain: the source is chosen once when the request is validated and
//! exactly one method is attempted per probe.

use std::fmt;

/// How the probe authenticates once the transport is connected.
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Password supplied with the request. An empty string is a valid
    /// password, not a fallback trigger.
    StaticSecret(String),
    /// Identities offered by the SSH agent resolved from the environment.
    AgentDerived,
}

impl CredentialSource {
    /// Selects the source for a request. Only a request that carried no
    /// password at all falls back to the agent.
    #[must_use]
    pub fn from_secret(secret: Option<String>) -> Self {
        match secret {
            Some(secret) => Self::StaticSecret(secret),
            None => Self::AgentDerived,
        }
    }

    /// Returns a display name for the selected method.
    #[must_use]
    pub fn method_name(&self) -> &'static str {
        match self {
            Self::StaticSecret(_) => "password",
            Self::AgentDerived => "agent",
        }
    }
}

// The secret must never leak into logs or panic messages.
impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaticSecret(_) => write!(f, "StaticSecret(***)"),
            Self::AgentDerived => write!(f, "AgentDerived"),
        }
    }
}
