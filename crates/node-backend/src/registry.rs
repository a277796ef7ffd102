//! Backend registry for selecting a node backend by name.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use crate::backend::NodeBackend;
use crate::config::BackendSettings;
use crate::error::BackendError;
use crate::lncli::LncliBackend;

/// Function that builds a backend from settings.
pub type BackendConstructor = fn(&BackendSettings) -> Result<Arc<dyn NodeBackend>, BackendError>;

/// Registry mapping backend names to constructors.
///
/// Resolved once at startup; an unknown name (including a backend whose
/// cargo feature is disabled) is a configuration error.
pub struct BackendRegistry {
    constructors: BTreeMap<String, BackendConstructor>,
}

impl BackendRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// Create a registry with every backend compiled into this build.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("lncli", build_lncli);
        #[cfg(feature = "eclair")]
        registry.register("eclair", build_eclair);
        registry
    }

    /// Register a constructor, replacing any previous one with the same name.
    pub fn register(&mut self, name: impl Into<String>, constructor: BackendConstructor) {
        self.constructors.insert(name.into(), constructor);
    }

    /// Names of registered backends, sorted.
    pub fn available(&self) -> Vec<&str> {
        self.constructors.keys().map(|s| s.as_str()).collect()
    }

    /// Check if a backend is registered.
    pub fn has_backend(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Build the backend registered under `name`.
    pub fn build(
        &self,
        name: &str,
        settings: &BackendSettings,
    ) -> Result<Arc<dyn NodeBackend>, BackendError> {
        let constructor = self.constructors.get(name).ok_or_else(|| {
            BackendError::UnknownBackend {
                name: name.to_string(),
                available: self.available().into_iter().map(String::from).collect(),
            }
        })?;

        info!("Creating {} node backend", name);
        constructor(settings)
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn build_lncli(settings: &BackendSettings) -> Result<Arc<dyn NodeBackend>, BackendError> {
    Ok(Arc::new(LncliBackend::new(settings.lncli.clone())))
}

#[cfg(feature = "eclair")]
fn build_eclair(settings: &BackendSettings) -> Result<Arc<dyn NodeBackend>, BackendError> {
    let backend = crate::eclair::EclairBackend::new(settings.eclair.clone())?;
    Ok(Arc::new(backend))
}
