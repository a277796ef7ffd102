//! eclair control over its authenticated HTTP API.

use std::fs;
use std::path::Path;

use async_trait::async_trait;
use hocon::HoconLoader;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::backend::NodeBackend;
use crate::config::EclairConfig;
use crate::error::BackendError;
use crate::policy::{FEE_RATE_SAT_PER_VBYTE, MSAT_PER_SAT};
use crate::types::{ChannelOpenParams, NodeAddress};

/// User name eclair-cli authenticates with; eclair only checks the password.
const API_USER: &str = "eclair-cli";

/// Config key holding the API password.
const PASSWORD_KEY: &str = "eclair.api.password";

/// Base value of the `channelFlags` field; bit 0 announces the channel.
const CHANNEL_FLAGS_BASE: u8 = 8;

/// Subset of the eclair `getinfo` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetInfoResponse {
    node_id: String,
    #[serde(default)]
    public_addresses: Vec<String>,
}

/// Backend that talks to eclair's HTTP API.
#[derive(Clone)]
pub struct EclairBackend {
    http: Client,
    config: EclairConfig,
    password: String,
}

impl EclairBackend {
    /// Create a backend, reading the API password from `config.config_path`.
    pub fn new(config: EclairConfig) -> Result<Self, BackendError> {
        let password = read_api_password(&config.config_path)?;
        Self::with_password(config, password)
    }

    /// Create a backend with an explicit API password.
    pub fn with_password(
        config: EclairConfig,
        password: impl Into<String>,
    ) -> Result<Self, BackendError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| BackendError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config,
            password: password.into(),
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &EclairConfig {
        &self.config
    }

    /// `channelFlags` value for the requested visibility.
    pub fn channel_flags(is_private: bool) -> u8 {
        CHANNEL_FLAGS_BASE + u8::from(!is_private)
    }

    /// POST a form-encoded API command.
    async fn query(
        &self,
        command: &str,
        params: &[(&str, String)],
    ) -> Result<reqwest::Response, reqwest::Error> {
        let url = self.config.command_url(command);
        debug!("eclair API call: {}", command);

        self.http
            .post(&url)
            .basic_auth(API_USER, Some(&self.password))
            .form(params)
            .send()
            .await
    }

    /// Issue a command and report whether it answered HTTP 200.
    async fn command_succeeds(&self, command: &str, params: &[(&str, String)]) -> bool {
        match self.query(command, params).await {
            Ok(resp) if resp.status() == StatusCode::OK => true,
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                warn!("eclair {} returned HTTP {}: {}", command, status, body);
                false
            }
            Err(e) => {
                warn!("eclair {} request failed: {}", command, e);
                false
            }
        }
    }
}

impl std::fmt::Debug for EclairBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EclairBackend")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl NodeBackend for EclairBackend {
    fn name(&self) -> &str {
        "eclair"
    }

    async fn get_uri(&self) -> Result<NodeAddress, BackendError> {
        let resp = self
            .query("getinfo", &[])
            .await
            .map_err(|e| BackendError::Unavailable(format!("eclair getinfo failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BackendError::Unavailable(format!(
                "eclair getinfo returned HTTP {}",
                status
            )));
        }

        let info: GetInfoResponse = resp.json().await.map_err(|e| {
            BackendError::Unavailable(format!("Malformed eclair getinfo response: {}", e))
        })?;

        let address = info.public_addresses.into_iter().next().ok_or_else(|| {
            BackendError::Unavailable("eclair node advertises no public address".to_string())
        })?;

        Ok(NodeAddress::new(format!("{}@{}", info.node_id, address)))
    }

    async fn open_channel(&self, params: &ChannelOpenParams) -> bool {
        if let Some(ref host) = params.connect_host {
            let uri = format!("{}@{}", params.remote_node_id, host);
            if !self.command_succeeds("connect", &[("uri", uri)]).await {
                return false;
            }
        }

        let Some(push_msat) = params.push_amount.checked_mul(MSAT_PER_SAT) else {
            warn!(push = params.push_amount, "Push amount does not fit in millisatoshis");
            return false;
        };

        let form = [
            ("nodeId", params.remote_node_id.clone()),
            ("fundingSatoshis", params.local_amount.to_string()),
            ("pushMsat", push_msat.to_string()),
            ("fundingFeerateSatByte", FEE_RATE_SAT_PER_VBYTE.to_string()),
            ("channelFlags", Self::channel_flags(params.is_private).to_string()),
        ];

        let opened = self.command_succeeds("open", &form).await;
        if opened {
            info!(
                remote = %params.remote_node_id,
                capacity = params.local_amount,
                push = params.push_amount,
                "eclair opened channel"
            );
        }
        opened
    }
}

/// Read `eclair.api.password` from an eclair config file.
pub fn read_api_password(path: &Path) -> Result<String, BackendError> {
    let contents = fs::read_to_string(path).map_err(|e| {
        BackendError::Config(format!("Cannot read {}: {}", path.display(), e))
    })?;

    find_config_value(&contents, PASSWORD_KEY)?.ok_or_else(|| {
        BackendError::Config(format!("{} not set in {}", PASSWORD_KEY, path.display()))
    })
}

/// Look up a dotted key in HOCON config text.
///
/// Returns `Ok(None)` when the key is absent or not a scalar.
pub fn find_config_value(contents: &str, key: &str) -> Result<Option<String>, BackendError> {
    let doc = HoconLoader::new()
        .no_system()
        .load_str(contents)
        .and_then(|loader| loader.hocon())
        .map_err(|e| BackendError::Config(format!("Invalid eclair config: {}", e)))?;

    let value = key.split('.').fold(&doc, |node, part| &node[part]);
    Ok(value.as_string())
}
