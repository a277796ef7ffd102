//! Configuration types for node backends.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default eclair API address.
pub const DEFAULT_ECLAIR_URL: &str = "http://127.0.0.1:8080";

/// Configuration for the local `lncli` backend.
#[derive(Debug, Clone)]
pub struct LncliConfig {
    /// Path or name of the lncli binary.
    pub binary: PathBuf,
    /// Bitcoin network passed as `--network` (e.g., "mainnet", "testnet").
    pub network: String,
}

impl LncliConfig {
    /// Create a configuration for the given network using `lncli` from `PATH`.
    pub fn new(network: impl Into<String>) -> Self {
        Self {
            binary: PathBuf::from("lncli"),
            network: network.into(),
        }
    }

    /// Use a specific lncli binary.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }
}

impl Default for LncliConfig {
    fn default() -> Self {
        Self::new("mainnet")
    }
}

/// Configuration for the eclair HTTP API backend.
#[derive(Debug, Clone)]
pub struct EclairConfig {
    /// Base URL of the eclair API (e.g., "http://127.0.0.1:8080").
    pub api_url: String,
    /// Path to `eclair.conf`, read once for `eclair.api.password`.
    pub config_path: PathBuf,
    /// Timeout applied to every API request.
    pub request_timeout: Duration,
}

impl EclairConfig {
    /// Create a configuration pointing at the given API URL.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    /// Read the API password from a specific config file.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = path.into();
        self
    }

    /// Get the URL of an API command.
    pub fn command_url(&self, command: &str) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), command)
    }
}

impl Default for EclairConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_ECLAIR_URL.to_string(),
            config_path: default_eclair_config_path(),
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// `~/.eclair/eclair.conf`, or a relative path if `HOME` is not set.
pub fn default_eclair_config_path() -> PathBuf {
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(".eclair")
        .join("eclair.conf")
}

/// Settings handed to backend constructors by the registry.
#[derive(Debug, Clone, Default)]
pub struct BackendSettings {
    /// Settings for the lncli backend.
    pub lncli: LncliConfig,
    /// Settings for the eclair backend.
    pub eclair: EclairConfig,
}

impl BackendSettings {
    /// Create settings for the given bitcoin network with default paths.
    pub fn for_network(network: impl Into<String>) -> Self {
        Self {
            lncli: LncliConfig::new(network),
            eclair: EclairConfig::default(),
        }
    }
}
