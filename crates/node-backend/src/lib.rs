//! Lightning node control backends.
//!
//! This crate drives the operator's Lightning node through a uniform
//! two-step protocol (optional peer connect, then channel open). It provides:
//!
//! - [`NodeBackend`] - The trait every backend implements
//! - [`LncliBackend`] - Controls a local LND node through the `lncli` tool
//! - `EclairBackend` - Controls an eclair node over its authenticated HTTP API
//!   (requires the `eclair` feature)
//! - [`BackendRegistry`] - Resolves a backend by name at startup
//!
//! # Example
//!
//! ```no_run
//! use node_backend::{BackendRegistry, BackendSettings};
//!
//! # async fn example() -> Result<(), node_backend::BackendError> {
//! let registry = BackendRegistry::with_defaults();
//! let backend = registry.build("lncli", &BackendSettings::default())?;
//!
//! let uri = backend.get_uri().await?;
//! println!("Node reachable at {}", uri);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod config;
#[cfg(feature = "eclair")]
pub mod eclair;
pub mod error;
pub mod lncli;
pub mod policy;
pub mod registry;
pub mod types;

pub use backend::NodeBackend;
pub use config::{BackendSettings, EclairConfig, LncliConfig};
#[cfg(feature = "eclair")]
pub use eclair::EclairBackend;
pub use error::BackendError;
pub use lncli::LncliBackend;
pub use registry::BackendRegistry;
pub use types::{ChannelOpenParams, NodeAddress};

// Re-export async_trait for backend implementors
pub use async_trait::async_trait;
