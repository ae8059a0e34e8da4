//! # Reminders Feature
//!
//! Persistent reminder lifecycle: durable store, add/list/acknowledge/remove
//! operations, and the hourly broadcast scan that nags until acknowledged.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod notify;
pub mod scheduler;
pub mod service;
pub mod store;

pub use notify::{NotificationItem, Notifier};
pub use scheduler::BroadcastScheduler;
pub use service::{parse_ordinal, Acknowledged, ActiveEntry, Added, ReminderService};
pub use store::{RecipientRecord, Reminder, ReminderId, ReminderStore, Store};
