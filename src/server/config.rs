//! Configuration loading for vidgated.
//!
//! Configuration is loaded from a TOML file with the following resolution
//! order:
//! 1. `--config <path>` (CLI flag)
//! 2. `./vidgate.toml` if present
//! 3. built-in defaults
//!
//! Everything is read once at startup and immutable thereafter. The
//! listening port can additionally be overridden via `--port` / the `PORT`
//! environment variable (applied in [`Config::bind_addr`]).

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::cache::CacheConfig;
use crate::error::{Result, VidgateError};

/// Top-level daemon configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

/// Server network configuration and failure policy.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:3000).
    #[serde(default = "default_address")]
    pub address: String,
    /// How the video route answers when the upstream fails. One policy per
    /// deployment, applied uniformly — mixing per request would break
    /// client predictability.
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

fn default_address() -> String {
    "0.0.0.0:3000".to_string()
}

/// Deployment-wide failure policy for the video route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Surface the failure: upstream status (else 500) plus a structured
    /// `{error, message, videoId}` payload. The default.
    #[default]
    ErrorStatus,
    /// Success-shaped output: 200 plus the fallback record.
    FallbackRecord,
}

/// Cache expiry settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Entry time-to-live in seconds (default: 3600).
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Interval between active sweep passes in seconds (default: 120).
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl CacheSettings {
    pub fn to_cache_config(&self) -> CacheConfig {
        CacheConfig::new()
            .ttl(Duration::from_secs(self.ttl_secs))
            .sweep_interval(Duration::from_secs(self.sweep_interval_secs))
    }
}

fn default_ttl_secs() -> u64 {
    3600
}

fn default_sweep_interval_secs() -> u64 {
    120
}

/// Upstream provider settings.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the Innertube endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds (default: 30).
    #[serde(default = "default_upstream_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_upstream_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.youtube.com".to_string()
}

fn default_upstream_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load from an explicit path, else `./vidgate.toml` if present, else
    /// defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let candidate = match path {
            Some(p) => Some(p.to_path_buf()),
            None => {
                let default = Path::new("vidgate.toml");
                default.exists().then(|| default.to_path_buf())
            }
        };

        match candidate {
            Some(p) => {
                let text = fs::read_to_string(&p).map_err(|e| {
                    VidgateError::Configuration(format!("cannot read {}: {e}", p.display()))
                })?;
                toml::from_str(&text).map_err(|e| {
                    VidgateError::Configuration(format!("invalid config {}: {e}", p.display()))
                })
            }
            None => Ok(Self::default()),
        }
    }

    /// Resolve the bind address, applying the port override if given.
    pub fn bind_addr(&self, port_override: Option<u16>) -> Result<SocketAddr> {
        let mut addr: SocketAddr = self.server.address.parse().map_err(|e| {
            VidgateError::Configuration(format!("invalid address {}: {e}", self.server.address))
        })?;
        if let Some(port) = port_override {
            addr.set_port(port);
        }
        Ok(addr)
    }
}
