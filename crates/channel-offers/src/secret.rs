//! Offer secret generation.

use rand::rngs::OsRng;
use rand::RngCore;

/// Secret size in bytes (256 bits).
pub const SECRET_LEN: usize = 32;

/// Generate a fresh offer secret: 32 bytes from the OS RNG, hex encoded.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_LEN];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Shortened secret for log lines.
pub(crate) fn redact(secret: &str) -> &str {
    secret.get(..8).unwrap_or(secret)
}
