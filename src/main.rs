//! reachprobe - Main entry point.
//!
//! Runs the SSH reachability probe service.
//!
//! Usage: reachprobe [OPTIONS]
//!
//! Options:
//!   --version, -v    Show version
//!   --port <PORT>    Override the listen port
//!   --no-log-file    Log to stderr instead of ~/.reachprobe/logs/

use std::env;
use std::sync::Arc;

use reachprobe::config::Config;
use reachprobe::logging;
use reachprobe::probe::ProbeController;
use reachprobe::rest::{ApiState, RestApiServer};

/// Crate version string.
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();

    // Handle --version flag
    if args.iter().any(|a| a == "--version" || a == "-v") {
        println!("reachprobe v{}", VERSION);
        return Ok(());
    }

    let mut config = Config::load();

    // Handle --port flag
    if let Some(pos) = args.iter().position(|a| a == "--port") {
        match args.get(pos + 1).and_then(|p| p.parse::<u16>().ok()) {
            Some(port) if port > 0 => config.port = port,
            _ => {
                eprintln!("--port requires a port number between 1 and 65535");
                std::process::exit(1);
            }
        }
    }

    // Handle --no-log-file flag
    if args.iter().any(|a| a == "--no-log-file") {
        config.log.enabled = false;
    }

    logging::init(&config.log)?;

    let state = Arc::new(ApiState::new(
        ProbeController::new(),
        config.connect_deadline,
        config.overall_deadline,
    ));

    let mut server = RestApiServer::start(state, Some(config.port)).await?;
    tracing::info!("reachprobe v{} listening on {}", VERSION, server.url());

    // Run until interrupted
    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");
    server.shutdown();

    Ok(())
}
