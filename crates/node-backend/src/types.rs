//! Types exchanged with node backends.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Connection string of a Lightning node, `pubkey@host:port`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeAddress(String);

impl NodeAddress {
    /// Wrap a connection string reported by a node.
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Get the connection string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the public key part (everything before `@`).
    pub fn pubkey(&self) -> &str {
        self.0.split_once('@').map_or(self.0.as_str(), |(pubkey, _)| pubkey)
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NodeAddress {
    fn from(uri: String) -> Self {
        Self(uri)
    }
}

/// Parameters of a single channel open request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelOpenParams {
    /// Hex encoded public key of the buyer's node.
    pub remote_node_id: String,
    /// Channel capacity funded by the operator, in satoshis.
    pub local_amount: u64,
    /// Amount pushed to the buyer on open, in satoshis.
    pub push_amount: u64,
    /// Open an unannounced channel.
    pub is_private: bool,
    /// Host to connect to first if the peer is not known yet.
    pub connect_host: Option<String>,
}

impl ChannelOpenParams {
    /// Create parameters for a public channel without a connect step.
    pub fn new(remote_node_id: impl Into<String>, local_amount: u64, push_amount: u64) -> Self {
        Self {
            remote_node_id: remote_node_id.into(),
            local_amount,
            push_amount,
            is_private: false,
            connect_host: None,
        }
    }

    /// Set the channel visibility.
    pub fn private(mut self, is_private: bool) -> Self {
        self.is_private = is_private;
        self
    }

    /// Connect to the given host before opening.
    pub fn with_connect_host(mut self, host: impl Into<String>) -> Self {
        self.connect_host = Some(host.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_address_pubkey() {
        let addr = NodeAddress::new("02abc@127.0.0.1:9735");
        assert_eq!(addr.pubkey(), "02abc");
        assert_eq!(addr.to_string(), "02abc@127.0.0.1:9735");

        let bare = NodeAddress::new("02abc");
        assert_eq!(bare.pubkey(), "02abc");
    }

    #[test]
    fn test_node_address_serializes_as_string() {
        let addr = NodeAddress::new("02abc@host:9735");
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"02abc@host:9735\"");
    }

    #[test]
    fn test_channel_open_params_builder() {
        let params = ChannelOpenParams::new("02abc", 100_000, 20_000)
            .private(true)
            .with_connect_host("node.example.com:9735");

        assert_eq!(params.remote_node_id, "02abc");
        assert_eq!(params.local_amount, 100_000);
        assert_eq!(params.push_amount, 20_000);
        assert!(params.is_private);
        assert_eq!(params.connect_host.as_deref(), Some("node.example.com:9735"));
    }
}
