//! Process tests for the lncli backend.
//!
//! Standard unix tools stand in for lncli: `true` and `false` exit with the
//! status an openchannel call would, `echo` prints something that is not
//! getinfo JSON.

#![cfg(unix)]

use node_backend::{BackendError, ChannelOpenParams, LncliBackend, LncliConfig, NodeBackend};

const NODE_ID: &str = "02eec7245d6b7d2ccb30380bfbe2a3648cd7a942653f5aa340edcea1f283686619";

fn backend_with(binary: &str) -> LncliBackend {
    LncliBackend::new(LncliConfig::new("regtest").with_binary(binary))
}

#[tokio::test]
async fn test_open_channel_succeeds_on_zero_exit() {
    let backend = backend_with("true");
    let params = ChannelOpenParams::new(NODE_ID, 100_000, 20_000).private(true);
    assert!(backend.open_channel(&params).await);
}

#[tokio::test]
async fn test_open_channel_fails_on_nonzero_exit() {
    let backend = backend_with("false");
    let params = ChannelOpenParams::new(NODE_ID, 100_000, 20_000);
    assert!(!backend.open_channel(&params).await);
}

#[tokio::test]
async fn test_open_channel_fails_when_binary_missing() {
    let backend = backend_with("/nonexistent/lncli");
    let params = ChannelOpenParams::new(NODE_ID, 100_000, 0);
    assert!(!backend.open_channel(&params).await);
}

#[tokio::test]
async fn test_get_uri_rejects_non_json_output() {
    let backend = backend_with("echo");
    let result = backend.get_uri().await;
    assert!(matches!(result, Err(BackendError::Unavailable(_))));
}

#[tokio::test]
async fn test_get_uri_fails_on_nonzero_exit() {
    let backend = backend_with("false");
    let result = backend.get_uri().await;
    assert!(matches!(result, Err(BackendError::Unavailable(_))));
}

#[tokio::test]
async fn test_get_uri_fails_when_binary_missing() {
    let backend = backend_with("/nonexistent/lncli");
    let result = backend.get_uri().await;
    assert!(matches!(result, Err(BackendError::Unavailable(_))));
}

#[test]
fn test_backend_name() {
    assert_eq!(backend_with("lncli").name(), "lncli");
}
