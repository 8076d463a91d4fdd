//! The persisted backend endpoint.
//!
//! [`EndpointConfig`] is handed explicitly to the chat session and the
//! settings dialog. Storage failures never escape it: reads fall back to an
//! empty string (demo mode) and writes become no-ops, each with a warning in
//! the diagnostics log.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};

use super::io::ConfigError;
use super::orchestrator::ConfigOrchestrator;

/// Backing storage for the endpoint string.
pub trait EndpointStore: Send + Sync {
    fn load_endpoint(&self) -> Result<String, ConfigError>;
    fn store_endpoint(&self, endpoint: &str) -> Result<(), ConfigError>;
}

impl EndpointStore for ConfigOrchestrator {
    fn load_endpoint(&self) -> Result<String, ConfigError> {
        Ok(self.load_with_cache()?.endpoint())
    }

    fn store_endpoint(&self, endpoint: &str) -> Result<(), ConfigError> {
        self.mutate(|config| config.set_endpoint(endpoint))
    }
}

/// Process-local store for tests and for runs without a config directory.
#[derive(Default)]
pub struct MemoryEndpointStore {
    value: Mutex<String>,
}

impl MemoryEndpointStore {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(initial.into()),
        }
    }
}

impl EndpointStore for MemoryEndpointStore {
    fn load_endpoint(&self) -> Result<String, ConfigError> {
        Ok(self
            .value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn store_endpoint(&self, endpoint: &str) -> Result<(), ConfigError> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = endpoint.to_string();
        Ok(())
    }
}

#[derive(Clone)]
pub struct EndpointConfig {
    store: Arc<dyn EndpointStore>,
}

impl fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("endpoint", &self.get())
            .finish()
    }
}

impl EndpointConfig {
    pub fn new(store: Arc<dyn EndpointStore>) -> Self {
        Self { store }
    }

    pub fn in_memory(initial: impl Into<String>) -> Self {
        Self::new(Arc::new(MemoryEndpointStore::new(initial)))
    }

    /// Current endpoint, trimmed. Empty means demo mode.
    pub fn get(&self) -> String {
        match self.store.load_endpoint() {
            Ok(endpoint) => endpoint.trim().to_string(),
            Err(err) => {
                warn!(error = %err, "endpoint unreadable, using demo mode");
                String::new()
            }
        }
    }

    pub fn set(&self, endpoint: &str) {
        let trimmed = endpoint.trim();
        match self.store.store_endpoint(trimmed) {
            Ok(()) => info!(endpoint = trimmed, "backend endpoint updated"),
            Err(err) => warn!(error = %err, "failed to persist backend endpoint"),
        }
    }

    pub fn clear(&self) {
        self.set("");
    }

    pub fn is_demo_mode(&self) -> bool {
        self.get().is_empty()
    }
}
