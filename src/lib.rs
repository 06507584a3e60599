//! reachprobe
//!
//! A small service that verifies, before an instance is provisioned
//! against a self-hosted target, that a remote host is reachable and
//! accepts the supplied credentials over SSH.
//!
//! # Architecture
//!
//! - **Probe Module**: the probe controller — one bounded reachability
//!   check racing its connect/verify/collect phases against a deadline,
//!   resolving to exactly one outcome
//! - **Rest Module**: axum HTTP boundary exposing the probe
//! - **Config/Logging**: rc-file configuration and file-based tracing logs
//!
//! # Usage
//!
//! ```no_run
//! use reachprobe::probe::{ProbeController, ProbeRequest};
//!
//! # async fn run() {
//! let controller = ProbeController::new();
//! let outcome = controller
//!     .probe(ProbeRequest::new("10.0.0.5", "admin").with_secret("secret"))
//!     .await;
//! println!("{}: {}", outcome.classification.as_str(), outcome.message);
//! # }
//! ```

// Clippy configuration - allow common patterns
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

pub mod config;
pub mod logging;
pub mod probe;
pub mod rest;

// Re-export main types
pub use config::Config;
pub use probe::{Classification, ProbeController, ProbeOutcome, ProbeRequest};
pub use rest::{ApiState, RestApiServer};
