//! Command handler registry
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation for handler dispatch

use std::collections::HashMap;
use std::sync::Arc;

use super::handler::SlashCommandHandler;

/// Registry mapping command names to handlers.
///
/// A handler is registered under every name it declares, so commands that
/// share logic share one handler instance.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    handlers: HashMap<&'static str, Arc<dyn SlashCommandHandler>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for its declared command names.
    pub fn register(&mut self, handler: Arc<dyn SlashCommandHandler>) {
        for name in handler.command_names() {
            self.handlers.insert(name, Arc::clone(&handler));
        }
    }

    /// Handler for a command name, if one is registered.
    pub fn get(&self, name: &str) -> Option<Arc<dyn SlashCommandHandler>> {
        self.handlers.get(name).cloned()
    }

    /// Check if a command is registered
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Number of registered command names (not unique handlers).
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
