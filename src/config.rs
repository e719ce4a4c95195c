use serde::{Deserialize, Serialize};

/// Live polling cadence, in seconds.
pub const POLL_INTERVAL_SECS: u64 = 12;
/// Minimum gap between timeline refreshes, in minutes.
pub const TIMELINE_REFRESH_MINUTES: i64 = 15;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub sync: SyncConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub base_url: String,
    /// Bearer token; `None` sends no Authorization header.
    pub api_token: Option<String>,
    /// Per-request timeout. `None` leaves the transport default in place.
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub poll_interval_secs: u64,
    pub timeline_refresh_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".into(),
            api_token: None,
            timeout_secs: Some(10),
        }
    }
}

impl ServerConfig {
    /// Config pointing at `base_url` with no token and the default timeout.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn timeout(&self) -> Option<std::time::Duration> {
        self.timeout_secs.map(std::time::Duration::from_secs)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: POLL_INTERVAL_SECS,
            timeline_refresh_minutes: TIMELINE_REFRESH_MINUTES,
        }
    }
}

impl SyncConfig {
    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.poll_interval_secs)
    }

    pub fn timeline_refresh(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.timeline_refresh_minutes)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            sync: SyncConfig::default(),
            telemetry: TelemetryConfig {
                log_level: "info".into(),
            },
        }
    }
}

impl Config {
    /// Load configuration from environment variables with defaults.
    ///
    /// Callers load `.env` first and install tracing before calling this, so
    /// the warnings below are not lost.
    ///
    /// Optional env vars:
    ///   DASHBOARD_BASE_URL: bot API root (default: http://127.0.0.1:5000)
    ///   IOS_DASHBOARD_TOKEN: bearer token; empty means unauthenticated
    ///   DASHBOARD_TIMEOUT_SECS: request timeout, 0 disables (default: 10)
    ///   RUST_LOG: log level (default: info)
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("DASHBOARD_BASE_URL") {
            if !url.trim().is_empty() {
                config.server.base_url = url.trim().to_string();
            }
        }

        if let Ok(token) = std::env::var("IOS_DASHBOARD_TOKEN") {
            if !token.is_empty() && token != "your_dashboard_token" {
                config.server.api_token = Some(token);
            }
        }

        if let Ok(timeout) = std::env::var("DASHBOARD_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(0) => config.server.timeout_secs = None,
                Ok(secs) => config.server.timeout_secs = Some(secs),
                Err(_) => tracing::warn!("Ignoring invalid DASHBOARD_TIMEOUT_SECS={timeout}"),
            }
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.telemetry.log_level = level;
        }

        if config.server.api_token.is_none() {
            tracing::info!("No IOS_DASHBOARD_TOKEN set — requests go out unauthenticated");
        }

        config
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let url = url::Url::parse(&self.server.base_url)
            .map_err(|e| anyhow::anyhow!("DASHBOARD_BASE_URL is not a valid URL: {e}"))?;
        anyhow::ensure!(
            matches!(url.scheme(), "http" | "https"),
            "DASHBOARD_BASE_URL must be http or https, got {}",
            url.scheme()
        );
        anyhow::ensure!(
            self.sync.poll_interval_secs > 0,
            "poll_interval_secs must be positive"
        );
        anyhow::ensure!(
            self.sync.timeline_refresh_minutes > 0,
            "timeline_refresh_minutes must be positive"
        );
        Ok(())
    }
}
