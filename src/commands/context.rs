//! Shared context for command handlers
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation with the reminder service

use crate::features::reminders::ReminderService;

/// Shared state handed to every command handler.
///
/// Holds the reminder service; all handlers operate on the same underlying
/// store through it.
#[derive(Clone)]
pub struct CommandContext {
    pub service: ReminderService,
}

impl CommandContext {
    pub fn new(service: ReminderService) -> Self {
        Self { service }
    }
}
