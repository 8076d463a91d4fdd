//! Settings management for CLI set/unset commands.
//!
//! Each configuration key has a [`SettingHandler`]; the [`SettingRegistry`]
//! maps the key typed on the command line to its handler.

pub mod error;
pub mod handlers;
pub mod registry;

pub use error::SettingError;
pub use registry::SettingRegistry;

use crate::core::config::{Config, ConfigOrchestrator};

/// Context provided to setting handlers during set/unset operations.
pub struct SetContext<'a> {
    pub orchestrator: &'a ConfigOrchestrator,
}

impl SetContext<'_> {
    /// Apply `mutator` to the stored config and return `message` on success.
    pub fn mutate<F>(&self, mutator: F, message: String) -> Result<String, SettingError>
    where
        F: FnOnce(&mut Config),
    {
        self.orchestrator.mutate(mutator)?;
        Ok(message)
    }
}

/// Trait for handling a configuration setting.
pub trait SettingHandler: Send + Sync {
    /// Returns the configuration key this handler manages.
    fn key(&self) -> &'static str;

    /// Set the value from the words following the key.
    /// Returns a success message to display.
    fn set(&self, args: &[String], ctx: &SetContext<'_>) -> Result<String, SettingError>;

    /// Remove the value so the default applies again.
    fn unset(&self, ctx: &SetContext<'_>) -> Result<String, SettingError>;
}

pub fn success_set(key: &str, value: &str) -> String {
    format!("✅ Set {key} to: {value}")
}

pub fn success_unset(key: &str) -> String {
    format!("✅ Unset {key}")
}
