// Core layer - configuration, errors, message utilities
pub mod core;

// Features layer - all feature modules
pub mod features;

// UI components - Discord buttons and broadcast delivery
pub mod message_components;

// Application layer
pub mod command_handler;
pub mod commands;

// Re-export core config
pub use crate::core::Config;

// Re-export feature items
pub use features::{
    BroadcastScheduler, NotificationItem, Notifier, Reminder, ReminderId, ReminderService,
    ReminderStore,
};
