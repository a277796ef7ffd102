//! Wire responses of the LNURL-channel protocol.

use node_backend::policy::{MIN_HTLC_MSAT, REMOTE_CSV_DELAY};
use serde::{Deserialize, Serialize};

use crate::error::OfferError;

/// `tag` value identifying a channel request.
pub const CHANNEL_REQUEST_TAG: &str = "channelRequest";

/// Base routing fee advertised for sold channels, in millisatoshis.
pub const FEE_BASE_MSAT: u64 = 10;

/// Proportional routing fee advertised for sold channels.
pub const FEE_PROPORTIONAL_MILLIONTHS: u64 = 500;

/// Channel request returned to the wallet for a pending offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelRequest {
    /// Operator node connection string.
    pub uri: String,
    /// URL the wallet calls to have the channel opened.
    pub callback: String,
    /// Offer secret.
    pub k1: String,
    /// Channel capacity in satoshis.
    pub capacity: u64,
    /// Amount pushed to the buyer in satoshis.
    pub push: u64,
    pub htlc_minimum_msat: u64,
    pub cltv_expiry_delta: u32,
    pub fee_base_msat: u64,
    pub fee_proportional_millionths: u64,
    pub tag: String,
}

impl ChannelRequest {
    /// Build a request with the fixed channel policy.
    pub fn new(
        uri: impl Into<String>,
        callback: impl Into<String>,
        k1: impl Into<String>,
        capacity: u64,
        push: u64,
    ) -> Self {
        Self {
            uri: uri.into(),
            callback: callback.into(),
            k1: k1.into(),
            capacity,
            push,
            htlc_minimum_msat: MIN_HTLC_MSAT,
            cltv_expiry_delta: REMOTE_CSV_DELAY,
            fee_base_msat: FEE_BASE_MSAT,
            fee_proportional_millionths: FEE_PROPORTIONAL_MILLIONTHS,
            tag: CHANNEL_REQUEST_TAG.to_string(),
        }
    }
}

/// Outcome marker of a status response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Ok,
    Error,
}

/// `{"status": "OK"}` or `{"status": "ERROR", "reason": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl StatusResponse {
    /// A success response.
    pub fn ok() -> Self {
        Self {
            status: Status::Ok,
            reason: None,
        }
    }

    /// An error response with a human-readable reason.
    pub fn error(reason: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            reason: Some(reason.into()),
        }
    }

    /// Check if this is a success response.
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}

impl From<&OfferError> for StatusResponse {
    fn from(err: &OfferError) -> Self {
        Self::error(err.to_string())
    }
}

impl From<OfferError> for StatusResponse {
    fn from(err: OfferError) -> Self {
        Self::from(&err)
    }
}

/// Response to a channel request lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChannelDataResponse {
    Channel(ChannelRequest),
    Error(StatusResponse),
}

impl ChannelDataResponse {
    /// Get the channel request, if the lookup succeeded.
    pub fn channel(&self) -> Option<&ChannelRequest> {
        match self {
            ChannelDataResponse::Channel(request) => Some(request),
            ChannelDataResponse::Error(_) => None,
        }
    }
}
