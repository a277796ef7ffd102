//! Scripted backend implementation - replays configured outcomes.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use node_backend::{async_trait, BackendError, ChannelOpenParams, NodeAddress, NodeBackend};

/// A backend whose answers are decided up front.
///
/// `open_channel` pops the next scripted outcome, falling back to the
/// default outcome once the script runs out. Every call is recorded.
pub struct ScriptedBackend {
    uri: Option<NodeAddress>,
    outcomes: Mutex<VecDeque<bool>>,
    default_outcome: bool,
    calls: Mutex<Vec<ChannelOpenParams>>,
}

impl ScriptedBackend {
    /// Create a backend reporting `uri` whose channel opens always succeed.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(NodeAddress::new(uri)),
            outcomes: Mutex::new(VecDeque::new()),
            default_outcome: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a backend whose channel opens always fail.
    pub fn failing(uri: impl Into<String>) -> Self {
        Self {
            default_outcome: false,
            ..Self::new(uri)
        }
    }

    /// Create a backend whose node cannot be reached.
    pub fn unreachable() -> Self {
        Self {
            uri: None,
            default_outcome: false,
            ..Self::new("")
        }
    }

    /// Queue outcomes for the next `open_channel` calls.
    pub fn with_outcomes(self, outcomes: impl IntoIterator<Item = bool>) -> Self {
        lock(&self.outcomes).extend(outcomes);
        self
    }

    /// All `open_channel` calls received so far.
    pub fn calls(&self) -> Vec<ChannelOpenParams> {
        lock(&self.calls).clone()
    }

    /// Number of `open_channel` calls received so far.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl NodeBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "ScriptedBackend"
    }

    async fn get_uri(&self) -> Result<NodeAddress, BackendError> {
        self.uri
            .clone()
            .ok_or_else(|| BackendError::Unavailable("scripted node is unreachable".to_string()))
    }

    async fn open_channel(&self, params: &ChannelOpenParams) -> bool {
        lock(&self.calls).push(params.clone());
        lock(&self.outcomes).pop_front().unwrap_or(self.default_outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_outcomes_then_default() {
        let backend = ScriptedBackend::new("02abc@host:9735").with_outcomes([false]);
        let params = ChannelOpenParams::new("03def", 1_000, 0);

        assert!(!backend.open_channel(&params).await);
        assert!(backend.open_channel(&params).await);
        assert!(backend.open_channel(&params).await);
        assert_eq!(backend.call_count(), 3);
    }

    #[tokio::test]
    async fn test_failing_backend() {
        let backend = ScriptedBackend::failing("02abc@host:9735");
        let params = ChannelOpenParams::new("03def", 1_000, 0);
        assert!(!backend.open_channel(&params).await);
        assert_eq!(backend.get_uri().await.unwrap().as_str(), "02abc@host:9735");
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let backend = ScriptedBackend::unreachable();
        assert!(matches!(
            backend.get_uri().await,
            Err(BackendError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_records_params() {
        let backend = ScriptedBackend::new("02abc@host:9735");
        let params = ChannelOpenParams::new("03def", 100_000, 20_000).private(true);
        backend.open_channel(&params).await;

        assert_eq!(backend.calls(), vec![params]);
    }

    #[test]
    fn test_backend_name() {
        assert_eq!(ScriptedBackend::new("x").name(), "ScriptedBackend");
    }
}
