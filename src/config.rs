//! Configuration module for reachprobe.
//!
//! Handles loading and parsing the ~/.reachprobe/config file, a simple
//! key = value file written with documented defaults on first run.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::logging::LogConfig;
use crate::probe::{DEFAULT_CONNECT_DEADLINE, DEFAULT_OVERALL_DEADLINE};
use crate::rest::DEFAULT_PORT;

/// Default config file content with all keys documented.
const DEFAULT_CONFIG: &str = r#"# reachprobe Configuration File
# ==============================
# This file is read on service startup.
# Lines starting with '#' are comments.

# HTTP Server
# -----------
# Port the REST API listens on (127.0.0.1 only).
# port = 7979

# Probe Deadlines
# ---------------
# Bound on establishing an authenticated SSH session, in seconds.
# connect_deadline = 8
#
# Bound on the entire probe including command execution, in seconds.
# Always at least connect_deadline.
# overall_deadline = 10

# Logging Configuration
# ---------------------
# Logs are stored in ~/.reachprobe/logs/ with automatic cleanup.
#
# log_enabled = true       # Enable/disable file logging (true/false)
# log_level = info         # Log level: trace, debug, info, warn, error, off
# log_retention = 24       # Hours to keep log files (default: 24)
"#;

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the REST API listens on.
    pub port: u16,
    /// Bound on establishing an authenticated session.
    pub connect_deadline: Duration,
    /// Bound on the entire probe.
    pub overall_deadline: Duration,
    /// Logging settings.
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            connect_deadline: DEFAULT_CONNECT_DEADLINE,
            overall_deadline: DEFAULT_OVERALL_DEADLINE,
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// Returns the config file path (~/.reachprobe/config).
    #[must_use]
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".reachprobe")
            .join("config")
    }

    /// Loads configuration from the default path, writing a documented
    /// default file on first run. Any read or parse problem falls back to
    /// defaults; configuration is never fatal.
    #[must_use]
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = fs::write(&path, DEFAULT_CONFIG);
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content),
            Err(_) => Self::default(),
        }
    }

    /// Parses config file content. Unknown keys are ignored; unparsable
    /// values keep their defaults.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut config = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "port" => {
                    if let Ok(port) = value.parse::<u16>() {
                        if port > 0 {
                            config.port = port;
                        }
                    }
                }
                "connect_deadline" => {
                    if let Ok(secs) = value.parse::<u64>() {
                        if secs > 0 {
                            config.connect_deadline = Duration::from_secs(secs);
                        }
                    }
                }
                "overall_deadline" => {
                    if let Ok(secs) = value.parse::<u64>() {
                        if secs > 0 {
                            config.overall_deadline = Duration::from_secs(secs);
                        }
                    }
                }
                "log_enabled" => {
                    config.log.enabled = value.eq_ignore_ascii_case("true");
                }
                "log_level" => {
                    config.log.level = LogConfig::parse_level(value);
                }
                "log_retention" => {
                    config.log.retention_hours = LogConfig::parse_retention(value);
                }
                _ => {}
            }
        }

        // The overall deadline can never undercut the connect deadline.
        config.overall_deadline = config.overall_deadline.max(config.connect_deadline);
        config
    }
}
