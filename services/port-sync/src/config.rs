//! Configuration for the port reconciler
//!
//! Configuration can be loaded from a TOML file and/or environment
//! variables. The environment variable names (`QBITTORRENT_HOST`,
//! `CHECK_INTERVAL`, ...) are the ones compose deployments already export,
//! so existing stacks work without a config file.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration for the reconciler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// WebUI endpoint and credentials
    #[serde(default)]
    pub qbittorrent: QbitConfig,

    /// VPN container whose logs carry the forwarded port
    #[serde(default)]
    pub container: ContainerConfig,

    /// Reconcile loop settings
    #[serde(default)]
    pub sync: SyncConfig,
}

/// WebUI endpoint and credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QbitConfig {
    /// WebUI host
    #[serde(default = "default_qbit_host")]
    pub host: String,

    /// WebUI port
    #[serde(default = "default_qbit_port")]
    pub port: u16,

    /// WebUI username
    #[serde(default = "default_qbit_username")]
    pub username: String,

    /// WebUI password
    #[serde(default = "default_qbit_password")]
    pub password: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_qbit_timeout")]
    pub timeout_seconds: u64,
}

impl QbitConfig {
    /// Base URL of the WebUI
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

fn default_qbit_host() -> String {
    "localhost".to_string()
}

fn default_qbit_port() -> u16 {
    8080
}

fn default_qbit_username() -> String {
    "admin".to_string()
}

fn default_qbit_password() -> String {
    "adminadmin".to_string()
}

fn default_qbit_timeout() -> u64 {
    10
}

impl Default for QbitConfig {
    fn default() -> Self {
        Self {
            host: default_qbit_host(),
            port: default_qbit_port(),
            username: default_qbit_username(),
            password: default_qbit_password(),
            timeout_seconds: default_qbit_timeout(),
        }
    }
}

/// VPN container whose logs carry the forwarded port
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerConfig {
    /// Container name or id
    #[serde(default = "default_container_name")]
    pub name: String,

    /// How many trailing log lines to scan each cycle
    #[serde(default = "default_tail_lines")]
    pub tail_lines: usize,
}

fn default_container_name() -> String {
    "transmission-openvpn".to_string()
}

fn default_tail_lines() -> usize {
    50
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            name: default_container_name(),
            tail_lines: default_tail_lines(),
        }
    }
}

/// Reconcile loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Seconds between reconcile cycles
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
}

fn default_interval() -> u64 {
    60
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            qbittorrent: QbitConfig::default(),
            container: ContainerConfig::default(),
            sync: SyncConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(e.to_string()))?;
        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(config)
    }

    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let mut config = Config::default();

        // WebUI
        if let Ok(host) = std::env::var("QBITTORRENT_HOST") {
            config.qbittorrent.host = host;
        }
        if let Ok(port) = std::env::var("QBITTORRENT_PORT") {
            if let Ok(p) = port.parse() {
                config.qbittorrent.port = p;
            }
        }
        if let Ok(user) = std::env::var("QBITTORRENT_USER") {
            config.qbittorrent.username = user;
        }
        if let Ok(pass) = std::env::var("QBITTORRENT_PASS") {
            config.qbittorrent.password = pass;
        }

        // Container
        if let Ok(name) = std::env::var("VPN_CONTAINER_NAME") {
            config.container.name = name;
        }
        if let Ok(lines) = std::env::var("LOG_TAIL_LINES") {
            if let Ok(n) = lines.parse() {
                config.container.tail_lines = n;
            }
        }

        // Sync loop
        if let Ok(interval) = std::env::var("CHECK_INTERVAL") {
            if let Ok(i) = interval.parse() {
                config.sync.interval_seconds = i;
            }
        }

        config
    }

    /// Load configuration from file if it exists, otherwise from environment
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigError> {
        if let Some(p) = path {
            if p.as_ref().exists() {
                return Self::from_file(p);
            }
        }
        Ok(Self::from_env())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
