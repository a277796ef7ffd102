//! In-memory offer storage.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Terms of a pending channel sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfferTerms {
    /// Channel capacity funded by the operator, in satoshis.
    pub local_amount: u64,
    /// Amount pushed to the buyer on open, in satoshis.
    pub push_amount: u64,
}

impl OfferTerms {
    pub fn new(local_amount: u64, push_amount: u64) -> Self {
        Self {
            local_amount,
            push_amount,
        }
    }
}

#[derive(Debug)]
struct StoredOffer {
    terms: OfferTerms,
    created_at: Instant,
    /// A channel open for this offer is running.
    in_flight: bool,
}

impl StoredOffer {
    fn is_expired(&self, ttl: Option<Duration>) -> bool {
        ttl.is_some_and(|ttl| self.created_at.elapsed() >= ttl)
    }
}

/// Why an offer could not be claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimError {
    /// No live offer under that secret.
    NotFound,
    /// The offer is already claimed by another request.
    InFlight,
}

/// Thread-safe map from offer secret to offer terms.
///
/// All access goes through one mutex that is never held across an await.
/// Consumption is two-phase: [`OfferStore::claim`] marks the offer busy so
/// no second request can start opening the same channel, and
/// [`Claim::commit`] removes it once the channel is open.
pub struct OfferStore {
    offers: Mutex<HashMap<String, StoredOffer>>,
    ttl: Option<Duration>,
}

impl Default for OfferStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OfferStore {
    /// Create a store whose offers never expire.
    pub fn new() -> Self {
        Self::with_ttl(None)
    }

    /// Create a store whose offers expire `ttl` after creation.
    pub fn with_ttl(ttl: Option<Duration>) -> Self {
        Self {
            offers: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn offers(&self) -> MutexGuard<'_, HashMap<String, StoredOffer>> {
        self.offers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store an offer under `secret`.
    pub fn put(&self, secret: impl Into<String>, terms: OfferTerms) {
        self.offers().insert(
            secret.into(),
            StoredOffer {
                terms,
                created_at: Instant::now(),
                in_flight: false,
            },
        );
    }

    /// Look up the terms of a live offer. Claimed offers are still visible.
    pub fn get(&self, secret: &str) -> Option<OfferTerms> {
        self.offers()
            .get(secret)
            .filter(|offer| !offer.is_expired(self.ttl))
            .map(|offer| offer.terms)
    }

    /// Remove an offer, returning its terms if it was present.
    pub fn remove(&self, secret: &str) -> Option<OfferTerms> {
        self.offers().remove(secret).map(|offer| offer.terms)
    }

    /// Claim a live offer for consumption.
    ///
    /// The claim is released when the returned guard is dropped without
    /// being committed.
    pub fn claim(&self, secret: &str) -> Result<Claim<'_>, ClaimError> {
        let mut offers = self.offers();
        let offer = offers
            .get_mut(secret)
            .filter(|offer| !offer.is_expired(self.ttl))
            .ok_or(ClaimError::NotFound)?;

        if offer.in_flight {
            return Err(ClaimError::InFlight);
        }
        offer.in_flight = true;

        Ok(Claim {
            store: self,
            secret: secret.to_string(),
            terms: offer.terms,
            committed: false,
        })
    }

    fn release(&self, secret: &str) {
        if let Some(offer) = self.offers().get_mut(secret) {
            offer.in_flight = false;
        }
    }

    /// Drop expired offers that are not being consumed. Returns how many
    /// were removed.
    pub fn prune_expired(&self) -> usize {
        let mut offers = self.offers();
        let before = offers.len();
        offers.retain(|_, offer| offer.in_flight || !offer.is_expired(self.ttl));
        before - offers.len()
    }

    /// Number of stored offers, including expired ones not yet pruned.
    pub fn len(&self) -> usize {
        self.offers().len()
    }

    /// Check if the store holds no offers.
    pub fn is_empty(&self) -> bool {
        self.offers().is_empty()
    }

    /// Configured offer lifetime.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }
}

/// Exclusive right to consume one offer.
#[derive(Debug)]
pub struct Claim<'a> {
    store: &'a OfferStore,
    secret: String,
    terms: OfferTerms,
    committed: bool,
}

impl Claim<'_> {
    /// Terms of the claimed offer.
    pub fn terms(&self) -> OfferTerms {
        self.terms
    }

    /// Remove the offer for good. Returns `false` if it vanished meanwhile.
    pub fn commit(mut self) -> bool {
        self.committed = true;
        self.store.remove(&self.secret).is_some()
    }
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.store.release(&self.secret);
        }
    }
}

impl std::fmt::Debug for OfferStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfferStore")
            .field("offers", &self.len())
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_put_get_remove() {
        let store = OfferStore::new();
        store.put("abc", OfferTerms::new(100_000, 20_000));

        assert_eq!(store.get("abc"), Some(OfferTerms::new(100_000, 20_000)));
        assert_eq!(store.get("missing"), None);
        assert_eq!(store.len(), 1);

        assert_eq!(store.remove("abc"), Some(OfferTerms::new(100_000, 20_000)));
        assert_eq!(store.get("abc"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = OfferStore::new();
        assert_eq!(store.remove("abc"), None);
        store.put("abc", OfferTerms::new(1, 0));
        assert!(store.remove("abc").is_some());
        assert_eq!(store.remove("abc"), None);
    }

    #[test]
    fn test_claim_is_exclusive() {
        let store = OfferStore::new();
        store.put("abc", OfferTerms::new(100_000, 0));

        let claim = store.claim("abc").unwrap();
        assert_eq!(claim.terms(), OfferTerms::new(100_000, 0));
        assert_eq!(store.claim("abc").unwrap_err(), ClaimError::InFlight);

        // Still visible to lookups while claimed.
        assert!(store.get("abc").is_some());
    }

    #[test]
    fn test_dropped_claim_is_released() {
        let store = OfferStore::new();
        store.put("abc", OfferTerms::new(100_000, 0));

        drop(store.claim("abc").unwrap());
        assert!(store.claim("abc").is_ok());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_commit_removes_offer() {
        let store = OfferStore::new();
        store.put("abc", OfferTerms::new(100_000, 0));

        let claim = store.claim("abc").unwrap();
        assert!(claim.commit());
        assert_eq!(store.get("abc"), None);
        assert_eq!(store.claim("abc").unwrap_err(), ClaimError::NotFound);
    }

    #[test]
    fn test_commit_after_concurrent_removal() {
        let store = OfferStore::new();
        store.put("abc", OfferTerms::new(100_000, 0));

        let claim = store.claim("abc").unwrap();
        store.remove("abc");
        assert!(!claim.commit());
    }

    #[test]
    fn test_claim_missing() {
        let store = OfferStore::new();
        assert_eq!(store.claim("abc").unwrap_err(), ClaimError::NotFound);
    }

    #[test]
    fn test_expired_offers_are_invisible() {
        let store = OfferStore::with_ttl(Some(Duration::from_millis(20)));
        store.put("abc", OfferTerms::new(100_000, 0));
        assert!(store.get("abc").is_some());

        sleep(Duration::from_millis(50));
        assert_eq!(store.get("abc"), None);
        assert_eq!(store.claim("abc").unwrap_err(), ClaimError::NotFound);
        assert_eq!(store.len(), 1);

        assert_eq!(store.prune_expired(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_prune_keeps_live_and_claimed_offers() {
        let store = OfferStore::with_ttl(Some(Duration::from_millis(20)));
        store.put("claimed", OfferTerms::new(1, 0));
        let claim = store.claim("claimed").unwrap();

        sleep(Duration::from_millis(50));
        store.put("fresh", OfferTerms::new(2, 0));

        assert_eq!(store.prune_expired(), 0);
        assert_eq!(store.len(), 2);
        assert!(claim.commit());
    }

    #[test]
    fn test_no_ttl_never_expires() {
        let store = OfferStore::new();
        store.put("abc", OfferTerms::new(1, 0));
        sleep(Duration::from_millis(10));
        assert_eq!(store.prune_expired(), 0);
        assert!(store.get("abc").is_some());
    }
}
