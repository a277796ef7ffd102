//! Delayed backend implementation - wraps another backend with artificial delay.

use std::time::Duration;

use node_backend::{async_trait, BackendError, ChannelOpenParams, NodeAddress, NodeBackend};
use tokio::time::sleep;

/// A backend that wraps another backend and delays every channel open.
///
/// Useful for testing timeouts and concurrent fulfillment of one offer.
pub struct DelayedBackend<B: NodeBackend> {
    inner: B,
    delay: Duration,
}

impl<B: NodeBackend> DelayedBackend<B> {
    /// Create a new DelayedBackend wrapping the given backend.
    pub fn new(inner: B, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Create a backend with a delay in milliseconds.
    pub fn with_millis(inner: B, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }

    /// Get the wrapped backend.
    pub fn inner(&self) -> &B {
        &self.inner
    }
}

#[async_trait]
impl<B: NodeBackend> NodeBackend for DelayedBackend<B> {
    fn name(&self) -> &str {
        "DelayedBackend"
    }

    async fn get_uri(&self) -> Result<NodeAddress, BackendError> {
        self.inner.get_uri().await
    }

    async fn open_channel(&self, params: &ChannelOpenParams) -> bool {
        sleep(self.delay).await;
        self.inner.open_channel(params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptedBackend;
    use std::time::Instant;

    #[tokio::test]
    async fn test_delayed_backend() {
        let backend = DelayedBackend::with_millis(ScriptedBackend::new("02abc@host:9735"), 100);
        let params = ChannelOpenParams::new("03def", 1_000, 0);

        let start = Instant::now();
        assert!(backend.open_channel(&params).await);
        assert!(start.elapsed() >= Duration::from_millis(100));
        assert_eq!(backend.inner().call_count(), 1);
    }

    #[test]
    fn test_backend_name() {
        let backend = DelayedBackend::with_millis(ScriptedBackend::new("x"), 0);
        assert_eq!(backend.name(), "DelayedBackend");
    }
}
