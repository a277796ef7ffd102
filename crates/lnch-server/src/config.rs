//! Configuration loaded from environment variables.

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use channel_offers::OfferPolicy;
use node_backend::config::{default_eclair_config_path, DEFAULT_ECLAIR_URL};
use node_backend::{
    BackendError, BackendRegistry, BackendSettings, EclairConfig, LncliConfig, NodeBackend,
};
use url::{Host, Url};

/// Network on which only secure domains are accepted.
const MAINNET: &str = "mainnet";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Operator key required by `/create`.
    pub auth_key: String,
    /// Public base URL including scheme (e.g., "https://shop.example.com").
    pub domain: String,
    /// Bitcoin network of the node.
    pub network: String,
    /// Name of the node backend.
    pub backend: String,
    /// Server bind address.
    pub web_addr: SocketAddr,
    /// Directory holding the admin page.
    pub www_root: PathBuf,
    /// Path prefix all routes are served under, `/` or `/<path>`.
    pub root_path: String,
    /// Offer lifetime; `None` keeps offers until consumed.
    pub offer_ttl: Option<Duration>,
    /// Upper bound on a single backend call.
    pub backend_timeout: Duration,
    /// lncli binary.
    pub lncli_path: PathBuf,
    /// eclair API URL.
    pub eclair_url: String,
    /// eclair.conf holding the API password.
    pub eclair_conf: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `LNCH_AUTH_KEY` | Operator key for `/create` | (required) |
    /// | `LNCH_DOMAIN` | Public base URL with scheme | (required) |
    /// | `LNCH_BACKEND` | `lncli` or `eclair` | (required) |
    /// | `LNCH_NETWORK` | Bitcoin network | `mainnet` |
    /// | `LNCH_WEB_ADDR` | Server bind address | `127.0.0.1:8050` |
    /// | `LNCH_WWW_ROOT` | Admin page directory | `./static` |
    /// | `LNCH_ROOT_PATH` | Route prefix | `/` |
    /// | `LNCH_OFFER_TTL_SECS` | Offer lifetime, 0 or unset = forever | unset |
    /// | `LNCH_BACKEND_TIMEOUT_SECS` | Backend call timeout | `120` |
    /// | `LNCH_LNCLI_PATH` | lncli binary | `lncli` |
    /// | `LNCH_ECLAIR_URL` | eclair API URL | `http://127.0.0.1:8080` |
    /// | `LNCH_ECLAIR_CONF` | eclair.conf path | `~/.eclair/eclair.conf` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let auth_key = var("LNCH_AUTH_KEY").ok_or(ConfigError::MissingAuthKey)?;
        let backend = var("LNCH_BACKEND").ok_or(ConfigError::MissingBackend)?;
        let domain = var("LNCH_DOMAIN").ok_or(ConfigError::MissingDomain)?;
        let network = var("LNCH_NETWORK").unwrap_or_else(|| MAINNET.to_string());

        validate_domain(&domain, &network)?;

        let web_addr = var("LNCH_WEB_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8050".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let www_root = var("LNCH_WWW_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./static"));

        let root_path = normalize_root_path(&var("LNCH_ROOT_PATH").unwrap_or_default());

        let offer_ttl = parse_secs(&var, "LNCH_OFFER_TTL_SECS")?
            .filter(|ttl| !ttl.is_zero());

        let backend_timeout =
            parse_secs(&var, "LNCH_BACKEND_TIMEOUT_SECS")?.unwrap_or(Duration::from_secs(120));
        if backend_timeout.is_zero() {
            return Err(ConfigError::InvalidNumber {
                var: "LNCH_BACKEND_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }

        let lncli_path = var("LNCH_LNCLI_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("lncli"));

        let eclair_url = var("LNCH_ECLAIR_URL").unwrap_or_else(|| DEFAULT_ECLAIR_URL.to_string());

        let eclair_conf = var("LNCH_ECLAIR_CONF")
            .map(PathBuf::from)
            .unwrap_or_else(default_eclair_config_path);

        Ok(Self {
            auth_key,
            domain,
            network,
            backend,
            web_addr,
            www_root,
            root_path,
            offer_ttl,
            backend_timeout,
            lncli_path,
            eclair_url,
            eclair_conf,
        })
    }

    /// Public URL prefix handed to the offer service.
    pub fn url_prefix(&self) -> String {
        let domain = self.domain.trim_end_matches('/');
        if self.root_path == "/" {
            domain.to_string()
        } else {
            format!("{}{}", domain, self.root_path)
        }
    }

    /// Offer and backend limits.
    pub fn offer_policy(&self) -> OfferPolicy {
        OfferPolicy {
            offer_ttl: self.offer_ttl,
            backend_timeout: self.backend_timeout,
        }
    }

    /// How often expired offers are pruned.
    pub fn prune_interval(&self) -> Option<Duration> {
        self.offer_ttl
            .map(|ttl| (ttl / 4).max(Duration::from_secs(1)))
    }

    /// Settings for the backend constructors.
    pub fn backend_settings(&self) -> BackendSettings {
        let mut eclair = EclairConfig::new(&self.eclair_url).with_config_path(&self.eclair_conf);
        eclair.request_timeout = self.backend_timeout;

        BackendSettings {
            lncli: LncliConfig::new(&self.network).with_binary(&self.lncli_path),
            eclair,
        }
    }

    /// Build the configured backend.
    pub fn build_backend(
        &self,
        registry: &BackendRegistry,
    ) -> Result<Arc<dyn NodeBackend>, ConfigError> {
        registry
            .build(&self.backend, &self.backend_settings())
            .map_err(ConfigError::from)
    }
}

/// Ensure the domain has a scheme and is safe for the network.
///
/// On mainnet wallets would otherwise fetch channel requests over plain
/// HTTP, so anything but `https` is refused unless the host is a `.onion`
/// service or on a private network.
pub fn validate_domain(domain: &str, network: &str) -> Result<(), ConfigError> {
    if !domain.starts_with("http://") && !domain.starts_with("https://") {
        return Err(ConfigError::MissingScheme);
    }

    let url = Url::parse(domain).map_err(|e| ConfigError::InvalidDomain(e.to_string()))?;

    if network == MAINNET && url.scheme() != "https" {
        let trusted = url.host().is_some_and(|host| is_onion(&host) || is_private(&host));
        if !trusted {
            return Err(ConfigError::InsecureDomain);
        }
    }

    Ok(())
}

fn is_onion(host: &Host<&str>) -> bool {
    matches!(host, Host::Domain(name) if name.ends_with(".onion"))
}

fn is_private(host: &Host<&str>) -> bool {
    match host {
        Host::Domain(name) => *name == "localhost" || name.ends_with(".local"),
        Host::Ipv4(ip) => is_private_ip(IpAddr::V4(*ip)),
        Host::Ipv6(ip) => is_private_ip(IpAddr::V6(*ip)),
    }
}

fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(ip) => ip.is_private() || ip.is_loopback() || ip.is_link_local(),
        // fc00::/7 unique local addresses
        IpAddr::V6(ip) => ip.is_loopback() || (ip.segments()[0] & 0xfe00) == 0xfc00,
    }
}

/// `/`, or the path with a leading and without a trailing slash.
fn normalize_root_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", trimmed)
    }
}

fn parse_secs<F>(var: &F, key: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    var(key)
        .map(|value| {
            value
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidNumber { var: key, value })
        })
        .transpose()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("LNCH_AUTH_KEY environment variable is required")]
    MissingAuthKey,

    #[error("LNCH_DOMAIN environment variable is required")]
    MissingDomain,

    #[error("LNCH_BACKEND environment variable is required (e.g. lncli, eclair)")]
    MissingBackend,

    #[error("The domain must start with http:// or https://")]
    MissingScheme,

    #[error("Invalid LNCH_DOMAIN: {0}")]
    InvalidDomain(String),

    #[error(
        "Insecure usage detected, you must use an https, onion or private network domain on mainnet"
    )]
    InsecureDomain,

    #[error("Invalid LNCH_WEB_ADDR format")]
    InvalidAddr,

    #[error("Invalid value {value:?} for {var}")]
    InvalidNumber { var: &'static str, value: String },

    #[error(transparent)]
    Backend(#[from] BackendError),
}
