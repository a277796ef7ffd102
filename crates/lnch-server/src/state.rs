//! Application state shared across handlers.

use std::sync::Arc;

use channel_offers::OfferService;
use subtle::ConstantTimeEq;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Offer service.
    pub service: Arc<OfferService>,
    /// Operator key guarding `/create`.
    pub auth_key: Arc<str>,
}

impl AppState {
    /// Create new application state.
    pub fn new(service: Arc<OfferService>, auth_key: &str) -> Self {
        Self {
            service,
            auth_key: Arc::from(auth_key),
        }
    }

    /// Check an operator key in constant time.
    pub fn authorize(&self, key: &str) -> bool {
        !self.auth_key.is_empty()
            && bool::from(key.as_bytes().ct_eq(self.auth_key.as_bytes()))
    }
}
