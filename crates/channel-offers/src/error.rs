//! Error types for offer handling.

use node_backend::BackendError;
use thiserror::Error;

use crate::lnurl::LnurlError;

/// Errors that can occur while creating or consuming offers.
///
/// The display text of the request-time variants is the `reason` the buyer's
/// wallet sees.
#[derive(Debug, Error)]
pub enum OfferError {
    /// No pending offer exists for the secret.
    #[error("Invalid secret")]
    InvalidSecret,

    /// The buyer's node id is not a compressed public key.
    #[error("Invalid remote node id")]
    InvalidNodeId,

    /// Another request is opening a channel for this offer right now.
    #[error("Channel opening already in progress")]
    OpenInFlight,

    /// The node backend did not open the channel.
    #[error("Failed to open a channel")]
    ChannelOpenFailed,

    /// The capacity is zero or the push does not fit in millisatoshis.
    #[error("Invalid amount")]
    InvalidAmount,

    /// The node backend failed outside of a channel open.
    #[error("Node backend error: {0}")]
    Backend(#[from] BackendError),

    /// The callback URL could not be encoded.
    #[error("LNURL error: {0}")]
    Lnurl(#[from] LnurlError),
}
