//! Request and response types for the REST API.

use serde::{Deserialize, Serialize};

use crate::probe::DEFAULT_PORT;

/// Request body for POST /api/v1/ssh/test.
///
/// All fields are optional at the wire level; missing host or username is
/// reported as a validation failure by the probe, not as a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeRequestBody {
    /// Target host or IP address.
    pub ip_address: Option<String>,
    /// Username to authenticate as.
    pub username: Option<String>,
    /// Password; absent means agent authentication.
    pub password: Option<String>,
    /// Port, accepted as a JSON number or string. Absent or unparsable
    /// values fall back to 22.
    #[serde(default)]
    pub port: Option<serde_json::Value>,
}

impl ProbeRequestBody {
    /// Parses the port field, defaulting to 22 when absent or unparsable.
    #[must_use]
    pub fn parsed_port(&self) -> u16 {
        let parsed = match &self.port {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::Number(n)) => {
                n.as_u64().and_then(|v| u16::try_from(v).ok())
            }
            Some(serde_json::Value::String(s)) => s.trim().parse::<u16>().ok(),
            Some(_) => None,
        };

        match parsed {
            Some(port) if port >= 1 => port,
            _ => DEFAULT_PORT,
        }
    }
}

/// Response body for probe results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResponseBody {
    /// Whether the probe succeeded.
    pub success: bool,
    /// Human-readable explanation.
    pub message: String,
}

/// Response for GET /api/v1/health.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok" while the server is serving.
    pub status: String,
    /// Crate version.
    pub version: String,
}
