//! HTTP transport for selling Lightning channels over LNURL.
//!
//! Exposes the LNURL-channel endpoints wallets call, the operator's
//! `/create` endpoint and the static admin page, all backed by one shared
//! [`channel_offers::OfferService`].

pub mod config;
pub mod routes;
pub mod state;

pub use config::{Config, ConfigError};
pub use routes::router;
pub use state::AppState;
