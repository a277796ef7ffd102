//! Channel policy shared by every backend.
//!
//! These stay identical across node implementations so that a sold channel
//! has the same terms no matter which node software opens it.

/// Relative timelock (blocks) required on the remote party's outputs.
pub const REMOTE_CSV_DELAY: u32 = 144;

/// Funding transaction fee rate, sat/vbyte.
pub const FEE_RATE_SAT_PER_VBYTE: u64 = 1;

/// Smallest HTLC the channel accepts, in millisatoshis.
pub const MIN_HTLC_MSAT: u64 = 1000;

/// Millisatoshis per satoshi.
pub const MSAT_PER_SAT: u64 = 1000;
