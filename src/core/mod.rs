//! # Core Module
//!
//! Configuration, error taxonomy, and Discord message-limit helpers.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod config;
pub mod errors;
pub mod response;

// Re-export commonly used items
pub use config::Config;
pub use errors::ReminderError;
pub use response::{chunk_for_message, truncate_for_message, MESSAGE_LIMIT};
