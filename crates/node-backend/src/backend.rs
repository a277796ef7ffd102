//! The NodeBackend trait definition.

use async_trait::async_trait;

use crate::error::BackendError;
use crate::types::{ChannelOpenParams, NodeAddress};

/// Control surface of a Lightning node used to sell channels.
///
/// Every implementation follows the same protocol: an optional connect to
/// the remote peer, then a funded channel open. The trait is object-safe
/// and is normally used as `Arc<dyn NodeBackend>`.
#[async_trait]
pub trait NodeBackend: Send + Sync {
    /// Short name the backend is registered under.
    fn name(&self) -> &str;

    /// Query the node for its own connection string.
    ///
    /// Fails with [`BackendError::Unavailable`] when the node cannot be
    /// reached or answers with data that cannot be parsed.
    async fn get_uri(&self) -> Result<NodeAddress, BackendError>;

    /// Open a channel to `params.remote_node_id`.
    ///
    /// Connects to `params.connect_host` first when one is given. Returns
    /// whether the open succeeded; ordinary failures (insufficient funds,
    /// peer refusal, failed connect, unreachable node) are `false`.
    async fn open_channel(&self, params: &ChannelOpenParams) -> bool;
}
