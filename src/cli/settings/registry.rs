//! Registry of setting handlers.

use std::collections::HashMap;

use super::handlers::{ChunkSizeHandler, DelayMsHandler, EndpointHandler};
use super::{SetContext, SettingError, SettingHandler};

/// Registry of all available setting handlers.
pub struct SettingRegistry {
    handlers: HashMap<&'static str, Box<dyn SettingHandler>>,
    /// Keys in the order they were registered, for error hints.
    display_order: Vec<&'static str>,
}

impl Default for SettingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            handlers: HashMap::new(),
            display_order: Vec::new(),
        };

        registry.register(Box::new(EndpointHandler));
        registry.register(Box::new(ChunkSizeHandler));
        registry.register(Box::new(DelayMsHandler));

        registry
    }

    fn register(&mut self, handler: Box<dyn SettingHandler>) {
        let key = handler.key();
        self.display_order.push(key);
        self.handlers.insert(key, handler);
    }

    pub fn get(&self, key: &str) -> Result<&dyn SettingHandler, SettingError> {
        self.handlers
            .get(key)
            .map(|handler| handler.as_ref())
            .ok_or_else(|| SettingError::UnknownKey {
                key: key.to_string(),
                known: self.display_order.clone(),
            })
    }

    pub fn set(
        &self,
        key: &str,
        args: &[String],
        ctx: &SetContext<'_>,
    ) -> Result<String, SettingError> {
        self.get(key)?.set(args, ctx)
    }

    pub fn unset(&self, key: &str, ctx: &SetContext<'_>) -> Result<String, SettingError> {
        self.get(key)?.unset(ctx)
    }
}
