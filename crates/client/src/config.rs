use std::time::Duration;

/// Where the notification server lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL without trailing slash (default: `http://localhost:5000`).
    pub base_url: String,
    /// Whole-request timeout (default: 10 seconds).
    pub timeout: Duration,
}

impl ClientConfig {
    /// Load from `NOTIFICATION_SERVER_URL`, falling back to the local
    /// default.
    pub fn from_env() -> Self {
        let base_url = std::env::var("NOTIFICATION_SERVER_URL")
            .unwrap_or_else(|_| "http://localhost:5000".into());
        Self::new(base_url)
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:5000")
    }
}
