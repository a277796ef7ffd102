//! LND control through the local `lncli` process.

use std::process::{Output, Stdio};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::backend::NodeBackend;
use crate::config::LncliConfig;
use crate::error::BackendError;
use crate::policy::{FEE_RATE_SAT_PER_VBYTE, MIN_HTLC_MSAT, REMOTE_CSV_DELAY};
use crate::types::{ChannelOpenParams, NodeAddress};

/// Subset of `lncli getinfo` output.
#[derive(Debug, Deserialize)]
struct GetInfoResponse {
    #[serde(default)]
    uris: Vec<String>,
}

/// Backend that shells out to `lncli`.
///
/// Every call spawns a fresh process. The child is killed if the calling
/// future is dropped before it exits, so a timeout never leaks processes.
#[derive(Debug, Clone)]
pub struct LncliBackend {
    config: LncliConfig,
}

impl LncliBackend {
    /// Create a backend with the given configuration.
    pub fn new(config: LncliConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &LncliConfig {
        &self.config
    }

    /// Build the `openchannel` arguments (everything after `--network <net>`).
    pub fn openchannel_args(params: &ChannelOpenParams) -> Vec<String> {
        let mut args = vec!["openchannel".to_string()];

        if let Some(ref host) = params.connect_host {
            args.push("--connect".to_string());
            args.push(host.clone());
        }

        if params.is_private {
            args.push("--private".to_string());
        }

        args.extend([
            "--remote_csv_delay".to_string(),
            REMOTE_CSV_DELAY.to_string(),
            "--sat_per_byte".to_string(),
            FEE_RATE_SAT_PER_VBYTE.to_string(),
            "--min_htlc_msat".to_string(),
            MIN_HTLC_MSAT.to_string(),
            params.remote_node_id.clone(),
            params.local_amount.to_string(),
            params.push_amount.to_string(),
        ]);

        args
    }

    /// Run lncli with the given subcommand arguments and collect its output.
    async fn run(&self, args: &[String]) -> Result<Output, BackendError> {
        debug!(
            "Running {} --network {} {}",
            self.config.binary.display(),
            self.config.network,
            args.join(" ")
        );

        Command::new(&self.config.binary)
            .arg("--network")
            .arg(&self.config.network)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                BackendError::Unavailable(format!(
                    "Failed to run {}: {}",
                    self.config.binary.display(),
                    e
                ))
            })
    }
}

/// Extract the first advertised URI from `lncli getinfo` JSON.
pub fn parse_getinfo(stdout: &[u8]) -> Result<NodeAddress, BackendError> {
    let info: GetInfoResponse = serde_json::from_slice(stdout)
        .map_err(|e| BackendError::Unavailable(format!("Malformed getinfo output: {}", e)))?;

    info.uris
        .into_iter()
        .next()
        .map(NodeAddress::from)
        .ok_or_else(|| BackendError::Unavailable("Node advertises no URIs".to_string()))
}

#[async_trait]
impl NodeBackend for LncliBackend {
    fn name(&self) -> &str {
        "lncli"
    }

    async fn get_uri(&self) -> Result<NodeAddress, BackendError> {
        let output = self.run(&["getinfo".to_string()]).await?;

        if !output.status.success() {
            return Err(BackendError::Unavailable(format!(
                "lncli getinfo exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        parse_getinfo(&output.stdout)
    }

    async fn open_channel(&self, params: &ChannelOpenParams) -> bool {
        let args = Self::openchannel_args(params);

        match self.run(&args).await {
            Ok(output) if output.status.success() => {
                info!(
                    remote = %params.remote_node_id,
                    capacity = params.local_amount,
                    push = params.push_amount,
                    "lncli opened channel"
                );
                true
            }
            Ok(output) => {
                warn!(
                    remote = %params.remote_node_id,
                    status = %output.status,
                    "lncli openchannel failed: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                );
                false
            }
            Err(e) => {
                warn!("lncli openchannel could not run: {}", e);
                false
            }
        }
    }
}
