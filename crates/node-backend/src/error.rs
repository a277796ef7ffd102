//! Error types for node backends.

use thiserror::Error;

/// Errors that can occur when talking to a Lightning node backend.
///
/// Channel open failures are not errors: `open_channel` reports them as
/// `false`. These variants cover startup and address lookup.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The node could not be reached or returned malformed data.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// Invalid or missing backend configuration.
    #[error("Invalid backend configuration: {0}")]
    Config(String),

    /// No backend is registered under the requested name.
    #[error("Unknown backend {name}, available backends: {}", available.join(", "))]
    UnknownBackend {
        name: String,
        available: Vec<String>,
    },

    /// Reading a local file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
