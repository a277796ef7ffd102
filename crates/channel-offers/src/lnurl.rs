//! LNURL codec: bech32 with the `lnurl` human-readable part.
//!
//! LNURLs are routinely longer than the 90 characters BIP-173 allows, so the
//! length limit is not applied.

use bech32::{FromBase32, ToBase32, Variant};
use thiserror::Error;

/// Human-readable part of every LNURL.
pub const HRP: &str = "lnurl";

/// Errors from LNURL encoding or decoding.
#[derive(Debug, Error)]
pub enum LnurlError {
    /// The text is not valid bech32.
    #[error("bech32 error: {0}")]
    Bech32(#[from] bech32::Error),

    /// The human-readable part is not `lnurl`.
    #[error("unexpected prefix {0:?}")]
    WrongPrefix(String),

    /// The text uses the bech32m checksum.
    #[error("unexpected bech32m checksum")]
    WrongVariant,

    /// The payload is not a UTF-8 URL.
    #[error("payload is not UTF-8")]
    NotUtf8(#[from] std::string::FromUtf8Error),
}

/// Encode raw URL bytes as a lowercase LNURL.
pub fn encode(url: &[u8]) -> Result<String, LnurlError> {
    Ok(bech32::encode(HRP, url.to_base32(), Variant::Bech32)?)
}

/// Decode an LNURL back into its URL.
pub fn decode(lnurl: &str) -> Result<String, LnurlError> {
    let (hrp, data, variant) = bech32::decode(&lnurl.to_lowercase())?;

    if hrp != HRP {
        return Err(LnurlError::WrongPrefix(hrp));
    }
    if variant != Variant::Bech32 {
        return Err(LnurlError::WrongVariant);
    }

    let bytes = Vec::<u8>::from_base32(&data)?;
    Ok(String::from_utf8(bytes)?)
}
