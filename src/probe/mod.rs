//! Remote reachability probe.
//!
//! Verifies, before an instance is provisioned against a self-hosted
//! target, that a remote host is reachable and accepts the supplied
//! credentials over SSH. One probe, one outcome:
//!
//! - [`ProbeRequest`] describes the attempt (host, credentials, deadlines)
//! - [`ProbeController`] races the connect/verify/collect phases against
//!   an overall deadline and resolves to exactly one [`ProbeOutcome`]
//! - the transport is exclusively owned per probe and released on every
//!   exit path, including a fired deadline

pub mod cancel;
pub mod controller;
pub mod credential;
pub mod mock;
pub mod outcome;
pub mod request;
pub mod transport;

pub use cancel::CancelToken;
pub use controller::{ProbeController, VERIFY_COMMAND};
pub use credential::CredentialSource;
pub use outcome::{Classification, ProbeOutcome};
pub use request::{
    DEFAULT_CONNECT_DEADLINE, DEFAULT_OVERALL_DEADLINE, DEFAULT_PORT, ProbeRequest,
};
pub use transport::{ExecOutput, SshTransport, Transport, TransportError, TransportSession};
