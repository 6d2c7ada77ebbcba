use std::time::Duration;

use euit_events::HubOptions;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `ALLOWED_ORIGINS`.
    /// A single `*` entry mirrors any request origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Grace period for background tasks at shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Interval between keep-alive pings (default: `15`).
    pub heartbeat_interval_secs: u64,
    /// Drop a connection after this long without inbound frames (default: `30`).
    pub client_timeout_secs: u64,
    /// Per-connection send timeout in milliseconds (default: `5000`).
    pub send_timeout_ms: u64,
    /// Per-connection outbound queue capacity (default: `64`).
    pub outbound_buffer: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                                                          |
    /// |--------------------------|------------------------------------------------------------------|
    /// | `HOST`                   | `0.0.0.0`                                                        |
    /// | `PORT`                   | `5000`                                                           |
    /// | `ALLOWED_ORIGINS`        | `http://localhost:3000,http://localhost:5000,http://localhost:8080` |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                                                             |
    /// | `SHUTDOWN_TIMEOUT_SECS`  | `30`                                                             |
    /// | `HEARTBEAT_INTERVAL_SECS`| `15`                                                             |
    /// | `CLIENT_TIMEOUT_SECS`    | `30`                                                             |
    /// | `SEND_TIMEOUT_MS`        | `5000`                                                           |
    /// | `OUTBOUND_BUFFER`        | `64`                                                             |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let cors_origins: Vec<String> = std::env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| {
                "http://localhost:3000,http://localhost:5000,http://localhost:8080".into()
            })
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let config = Self {
            host,
            port: env_parse("PORT", 5000),
            cors_origins,
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_parse("SHUTDOWN_TIMEOUT_SECS", 30),
            heartbeat_interval_secs: env_parse("HEARTBEAT_INTERVAL_SECS", 15),
            client_timeout_secs: env_parse("CLIENT_TIMEOUT_SECS", 30),
            send_timeout_ms: env_parse("SEND_TIMEOUT_MS", 5000),
            outbound_buffer: env_parse("OUTBOUND_BUFFER", 64),
        };

        if let Err(e) = config.validate() {
            panic!("Invalid server configuration: {e}");
        }
        config
    }

    /// Check the transport timings against each other.
    ///
    /// The heartbeat interval must be non-zero, and the idle timeout must
    /// exceed it so a client answering pings is never dropped.
    pub fn validate(&self) -> Result<(), String> {
        if self.heartbeat_interval_secs == 0 {
            return Err("HEARTBEAT_INTERVAL_SECS must be greater than 0".into());
        }
        if self.client_timeout_secs <= self.heartbeat_interval_secs {
            return Err(format!(
                "CLIENT_TIMEOUT_SECS ({}) must be greater than HEARTBEAT_INTERVAL_SECS ({})",
                self.client_timeout_secs, self.heartbeat_interval_secs
            ));
        }
        Ok(())
    }

    /// Whether any origin is allowed (`ALLOWED_ORIGINS=*`).
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }

    pub fn hub_options(&self) -> HubOptions {
        HubOptions {
            send_timeout: Duration::from_millis(self.send_timeout_ms),
            outbound_buffer: self.outbound_buffer,
        }
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    pub fn client_timeout(&self) -> Duration {
        Duration::from_secs(self.client_timeout_secs)
    }
}

/// Read and parse an env var, falling back to `default` when unset.
///
/// Panics on a present but unparseable value so misconfiguration fails at
/// startup.
fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be a valid value: {e}")),
        Err(_) => default,
    }
}
