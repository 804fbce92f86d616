use serde::Deserialize;
use std::{fmt, time::Duration};
use tokio::io;

const DEFAULT_BASE_URL: &str = "http://localhost:6989";
const DEFAULT_RECONNECT_ATTEMPTS: u32 = 3;
const DEFAULT_RECONNECT_INTERVAL_MS: u64 = 2000;
const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 300;
const DEFAULT_EVENT_BUFFER: usize = 100;

/// Tunables for one gateway session. Defaults mirror the production
/// deployment; tests shrink the intervals.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub base_url: String,
    pub reconnect_attempts: u32,
    pub reconnect_interval_ms: u64,
    pub upload_timeout_secs: u64,
    pub event_buffer: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            reconnect_attempts: DEFAULT_RECONNECT_ATTEMPTS,
            reconnect_interval_ms: DEFAULT_RECONNECT_INTERVAL_MS,
            upload_timeout_secs: DEFAULT_UPLOAD_TIMEOUT_SECS,
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

impl GatewayConfig {
    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_millis(self.reconnect_interval_ms)
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(ConfigError::from)
    }

    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let raw = tokio::fs::read_to_string(path).await?;
        Self::from_toml_str(&raw)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "config io error: {msg}"),
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
