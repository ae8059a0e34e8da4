// Features layer - all feature modules
pub mod reminders;

pub use reminders::{
    BroadcastScheduler, NotificationItem, Notifier, Reminder, ReminderId, ReminderService,
    ReminderStore,
};
