//! Mock node backends for testing channel offer handling.
//!
//! This crate provides implementations of the `NodeBackend` trait that never
//! touch a real Lightning node:
//! - `ScriptedBackend` - Answers with scripted outcomes and records every call
//! - `DelayedBackend` - Wraps another backend with artificial latency
//!
//! # Example
//!
//! ```rust
//! use mock_backend::{ChannelOpenParams, NodeBackend, ScriptedBackend};
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = ScriptedBackend::new("02abc@127.0.0.1:9735").with_outcomes([false, true]);
//!     let params = ChannelOpenParams::new("03def", 100_000, 0);
//!
//!     assert!(!backend.open_channel(&params).await);
//!     assert!(backend.open_channel(&params).await);
//!     assert_eq!(backend.call_count(), 2);
//! }
//! ```

mod delayed;
mod scripted;

// Re-export node-backend types for convenience
pub use node_backend::{async_trait, BackendError, ChannelOpenParams, NodeAddress, NodeBackend};

pub use delayed::DelayedBackend;
pub use scripted::ScriptedBackend;
