use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use crate::catalog::TmdbConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    /// TMDB catalog reader (catalog views are unavailable without it)
    #[serde(default)]
    pub tmdb: Option<TmdbConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Watchlist persistence configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// SQLite file holding the key/value store
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
    /// Key under which the watchlist snapshot is stored
    #[serde(default = "default_watchlist_key")]
    pub watchlist_key: String,
    /// Largest value the store accepts, in bytes (0 = unlimited)
    #[serde(default = "default_max_value_bytes")]
    pub max_value_bytes: usize,
}

impl StorageConfig {
    /// Per-value quota to enforce, if any.
    pub fn quota(&self) -> Option<usize> {
        (self.max_value_bytes > 0).then_some(self.max_value_bytes)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            watchlist_key: default_watchlist_key(),
            max_value_bytes: default_max_value_bytes(),
        }
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("reel.db")
}

fn default_watchlist_key() -> String {
    "watchlist".to_string()
}

fn default_max_value_bytes() -> usize {
    5 * 1024 * 1024
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb: Option<SanitizedTmdbConfig>,
}

/// Sanitized TMDB config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTmdbConfig {
    pub base_url: Option<String>,
    pub language: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            storage: config.storage.clone(),
            tmdb: config.tmdb.as_ref().map(|t| SanitizedTmdbConfig {
                base_url: t.base_url.clone(),
                language: t.language.clone(),
                api_key_configured: !t.api_key.is_empty(),
                timeout_secs: t.timeout_secs,
            }),
        }
    }
}
