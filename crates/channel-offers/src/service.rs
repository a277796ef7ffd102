//! Offer orchestration: create, look up and fulfill channel offers.

use std::sync::Arc;
use std::time::Duration;

use node_backend::policy::MSAT_PER_SAT;
use node_backend::{BackendError, ChannelOpenParams, NodeAddress, NodeBackend};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::error::OfferError;
use crate::lnurl;
use crate::remote::RemoteNode;
use crate::response::{ChannelDataResponse, ChannelRequest, StatusResponse};
use crate::secret::{generate_secret, redact};
use crate::store::{ClaimError, OfferStore, OfferTerms};

/// Limits applied to offers and backend calls.
#[derive(Debug, Clone)]
pub struct OfferPolicy {
    /// Lifetime of an unconsumed offer. `None` keeps offers until consumed.
    pub offer_ttl: Option<Duration>,
    /// Upper bound on a single backend call; hitting it counts as failure.
    pub backend_timeout: Duration,
}

impl Default for OfferPolicy {
    fn default() -> Self {
        Self {
            offer_ttl: None,
            backend_timeout: Duration::from_secs(120),
        }
    }
}

/// Sells channels: mints offers, serves channel requests and opens channels.
///
/// Constructed once at startup and shared (`Arc<OfferService>`) with every
/// request handler. The node's own address is fetched at construction and
/// never refreshed.
pub struct OfferService {
    backend: Arc<dyn NodeBackend>,
    store: OfferStore,
    node_uri: NodeAddress,
    url_prefix: String,
    policy: OfferPolicy,
}

impl OfferService {
    /// Create the service, asking the backend for the node's address.
    ///
    /// `url_prefix` is the public base URL (scheme, host and optional path)
    /// under which the transport serves `/rq/0/` and `/rq/1/`.
    pub async fn new(
        backend: Arc<dyn NodeBackend>,
        url_prefix: impl Into<String>,
        policy: OfferPolicy,
    ) -> Result<Self, OfferError> {
        let node_uri = match timeout(policy.backend_timeout, backend.get_uri()).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(BackendError::Unavailable(format!(
                    "{} did not report its address within {:?}",
                    backend.name(),
                    policy.backend_timeout
                ))
                .into())
            }
        };

        let url_prefix = url_prefix.into().trim_end_matches('/').to_string();
        info!(node = %node_uri, backend = backend.name(), "Offer service ready");

        Ok(Self {
            backend,
            store: OfferStore::with_ttl(policy.offer_ttl),
            node_uri,
            url_prefix,
            policy,
        })
    }

    /// The node address advertised in every channel request.
    pub fn node_uri(&self) -> &NodeAddress {
        &self.node_uri
    }

    /// Public base URL of the service.
    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Applied policy.
    pub fn policy(&self) -> &OfferPolicy {
        &self.policy
    }

    /// Number of stored offers.
    pub fn pending_offers(&self) -> usize {
        self.store.len()
    }

    /// URL the wallet fetches the channel request from.
    pub fn request_url(&self, secret: &str) -> String {
        format!("{}/rq/0/{}", self.url_prefix, secret)
    }

    /// URL the wallet calls to have the channel opened.
    pub fn callback_url(&self) -> String {
        format!("{}/rq/1/", self.url_prefix)
    }

    /// Create an offer and return its LNURL.
    pub async fn create_offer(
        &self,
        local_amount: u64,
        push_amount: u64,
    ) -> Result<String, OfferError> {
        // Backends express the push in millisatoshis.
        if local_amount == 0 || push_amount.checked_mul(MSAT_PER_SAT).is_none() {
            return Err(OfferError::InvalidAmount);
        }

        let secret = generate_secret();
        let lnurl = lnurl::encode(self.request_url(&secret).as_bytes())?;
        self.store
            .put(secret.clone(), OfferTerms::new(local_amount, push_amount));

        info!(
            offer = redact(&secret),
            capacity = local_amount,
            push = push_amount,
            "Created channel offer"
        );

        Ok(lnurl)
    }

    /// Channel request for a pending offer.
    pub async fn get_channel_data(&self, secret: &str) -> ChannelDataResponse {
        match self.store.get(secret) {
            Some(terms) => ChannelDataResponse::Channel(ChannelRequest::new(
                self.node_uri.as_str(),
                self.callback_url(),
                secret,
                terms.local_amount,
                terms.push_amount,
            )),
            None => {
                debug!(offer = redact(secret), "Channel request for unknown offer");
                ChannelDataResponse::Error(StatusResponse::from(OfferError::InvalidSecret))
            }
        }
    }

    /// Open the offered channel to the buyer's node.
    ///
    /// On success the offer is consumed. On failure it stays pending and the
    /// buyer may retry with the same secret.
    pub async fn fulfill(
        &self,
        secret: &str,
        remote_node_id: &str,
        is_private: bool,
    ) -> StatusResponse {
        match self.try_fulfill(secret, remote_node_id, is_private).await {
            Ok(()) => StatusResponse::ok(),
            Err(err) => StatusResponse::from(err),
        }
    }

    async fn try_fulfill(
        &self,
        secret: &str,
        remote_node_id: &str,
        is_private: bool,
    ) -> Result<(), OfferError> {
        if self.store.get(secret).is_none() {
            return Err(OfferError::InvalidSecret);
        }

        let remote: RemoteNode = remote_node_id.parse()?;

        let claim = self.store.claim(secret).map_err(|e| match e {
            ClaimError::NotFound => OfferError::InvalidSecret,
            ClaimError::InFlight => OfferError::OpenInFlight,
        })?;
        let terms = claim.terms();

        let params = ChannelOpenParams {
            remote_node_id: remote.pubkey,
            local_amount: terms.local_amount,
            push_amount: terms.push_amount,
            is_private,
            connect_host: remote.host,
        };

        let open = self.backend.open_channel(&params);
        let opened = match timeout(self.policy.backend_timeout, open).await {
            Ok(opened) => opened,
            Err(_) => {
                warn!(
                    offer = redact(secret),
                    "Channel open timed out after {:?}", self.policy.backend_timeout
                );
                false
            }
        };

        if !opened {
            warn!(
                offer = redact(secret),
                remote = %params.remote_node_id,
                "Failed to open channel"
            );
            return Err(OfferError::ChannelOpenFailed);
        }

        if !claim.commit() {
            warn!(offer = redact(secret), "Offer vanished while its channel was opening");
            return Err(OfferError::InvalidSecret);
        }

        info!(
            offer = redact(secret),
            remote = %params.remote_node_id,
            capacity = terms.local_amount,
            push = terms.push_amount,
            private = is_private,
            "Channel opened, offer consumed"
        );
        Ok(())
    }

    /// Drop expired offers. Returns how many were removed.
    pub fn prune_expired(&self) -> usize {
        let pruned = self.store.prune_expired();
        if pruned > 0 {
            info!("Pruned {} expired offers", pruned);
        }
        pruned
    }

    /// Start a background task that prunes expired offers every `interval`.
    pub fn start_pruner(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let service = Arc::clone(self);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                service.prune_expired();
            }
        })
    }
}

impl std::fmt::Debug for OfferService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfferService")
            .field("backend", &self.backend.name())
            .field("node_uri", &self.node_uri)
            .field("url_prefix", &self.url_prefix)
            .field("store", &self.store)
            .finish()
    }
}
