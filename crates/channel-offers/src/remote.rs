//! Parsing of the buyer's node identity.

use std::str::FromStr;

use crate::error::OfferError;

/// Length of a compressed secp256k1 public key in bytes.
const PUBKEY_LEN: usize = 33;

/// The buyer's node as given in the `remoteid` query parameter.
///
/// Either a bare hex public key or `pubkey@host[:port]`; the host is used as
/// the backend's connect target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteNode {
    /// Lowercase hex compressed public key.
    pub pubkey: String,
    /// Address to connect to before opening, if one was given.
    pub host: Option<String>,
}

impl FromStr for RemoteNode {
    type Err = OfferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (pubkey, host) = match s.trim().split_once('@') {
            Some((pubkey, host)) if is_valid_host(host) => (pubkey, Some(host.to_string())),
            Some(_) => return Err(OfferError::InvalidNodeId),
            None => (s.trim(), None),
        };

        let bytes = hex::decode(pubkey).map_err(|_| OfferError::InvalidNodeId)?;
        if bytes.len() != PUBKEY_LEN || !matches!(bytes[0], 0x02 | 0x03) {
            return Err(OfferError::InvalidNodeId);
        }

        Ok(Self {
            pubkey: pubkey.to_ascii_lowercase(),
            host,
        })
    }
}

/// Hosts end up as command-line values, so nothing flag-like or blank.
fn is_valid_host(host: &str) -> bool {
    !host.is_empty() && !host.starts_with('-') && !host.chars().any(char::is_whitespace)
}
