use std::time::Duration;

/// Default request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;

/// Default connect timeout in seconds.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Transport configuration for talking to a frame.
///
/// Both timeouts are short so a single hung request cannot stall the
/// caller; a timeout surfaces as a connectivity failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Whole-request timeout, including reading the body.
    pub request_timeout: Duration,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default |
    /// |------------------------------|---------|
    /// | `FRAME_REQUEST_TIMEOUT_SECS` | `5`     |
    /// | `FRAME_CONNECT_TIMEOUT_SECS` | `5`     |
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        Self {
            request_timeout: Duration::from_secs(env_secs(
                "FRAME_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )),
            connect_timeout: Duration::from_secs(env_secs(
                "FRAME_CONNECT_TIMEOUT_SECS",
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )),
        }
    }
}

fn env_secs(name: &str, default: u64) -> u64 {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(name, value = %raw, default, "Ignoring unparseable timeout");
            default
        }),
        Err(_) => default,
    }
}
