//! Channel offer lifecycle for selling Lightning channels over LNURL.
//!
//! An operator creates an offer (capacity + push amount) and hands the buyer
//! an LNURL. The buyer's wallet fetches the channel request for the offer's
//! secret (`k1`), then asks for the channel to be opened to its node. Each
//! offer is consumed at most once.
//!
//! - [`OfferService`] - Creates, looks up and fulfills offers
//! - [`OfferStore`] - In-memory offer map with at-most-once consumption
//! - [`lnurl`] - LNURL bech32 codec
//! - [`ChannelDataResponse`] / [`StatusResponse`] - Wire responses
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use channel_offers::{OfferPolicy, OfferService};
//! use node_backend::{LncliBackend, LncliConfig};
//!
//! # async fn example() -> Result<(), channel_offers::OfferError> {
//! let backend = Arc::new(LncliBackend::new(LncliConfig::new("mainnet")));
//! let service =
//!     OfferService::new(backend, "https://shop.example.com", OfferPolicy::default()).await?;
//!
//! let lnurl = service.create_offer(100_000, 20_000).await?;
//! println!("Scan me: {}", lnurl);
//! # Ok(())
//! # }
//! ```

mod error;
pub mod lnurl;
mod remote;
mod response;
mod secret;
mod service;
mod store;

pub use error::OfferError;
pub use lnurl::LnurlError;
pub use remote::RemoteNode;
pub use response::{
    ChannelDataResponse, ChannelRequest, Status, StatusResponse, CHANNEL_REQUEST_TAG,
    FEE_BASE_MSAT, FEE_PROPORTIONAL_MILLIONTHS,
};
pub use secret::generate_secret;
pub use service::{OfferPolicy, OfferService};
pub use store::{Claim, ClaimError, OfferStore, OfferTerms};
