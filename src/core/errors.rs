//! Error types for the reminder engine
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial taxonomy (validation, range, not-found, storage)

use thiserror::Error;

use crate::features::reminders::ReminderId;

/// Errors produced by reminder operations.
///
/// The first four variants are user-recoverable: handlers turn them into a
/// corrective reply and no state changes. The storage variants are not — the
/// operation is reported failed to the caller, and the in-memory store may
/// already reflect the mutation (see DESIGN.md on the durability gap).
#[derive(Debug, Error)]
pub enum ReminderError {
    /// Reminder text was empty or whitespace-only
    #[error("reminder text must not be empty")]
    EmptyText,

    /// Ordinal input did not parse as an integer
    #[error("'{input}' is not a number")]
    InvalidOrdinal { input: String },

    /// Numeric ordinal outside the current active range [1, count]
    #[error("reminder number {ordinal} is out of range (you have {count} active)")]
    OrdinalOutOfRange { ordinal: i64, count: usize },

    /// Acknowledgement referenced an id this recipient does not have
    #[error("no reminder with id {id}")]
    UnknownReminder { id: ReminderId },

    /// Durable read/write failed
    #[error("reminder storage failure: {0}")]
    Storage(#[from] std::io::Error),

    /// Durable state exists but does not parse
    #[error("reminder data is corrupt: {0}")]
    CorruptData(#[from] serde_json::Error),
}

impl ReminderError {
    /// True for errors that are answered with a corrective message to the
    /// user rather than propagated as an operation failure.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ReminderError::EmptyText
                | ReminderError::InvalidOrdinal { .. }
                | ReminderError::OrdinalOutOfRange { .. }
                | ReminderError::UnknownReminder { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_classification() {
        assert!(ReminderError::EmptyText.is_user_error());
        assert!(ReminderError::InvalidOrdinal {
            input: "abc".to_string()
        }
        .is_user_error());
        assert!(ReminderError::OrdinalOutOfRange {
            ordinal: 5,
            count: 2
        }
        .is_user_error());
        assert!(ReminderError::UnknownReminder { id: 3 }.is_user_error());

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(!ReminderError::Storage(io).is_user_error());
    }

    #[test]
    fn test_display_includes_bound() {
        let err = ReminderError::OrdinalOutOfRange {
            ordinal: 9,
            count: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains('9'));
        assert!(msg.contains('3'));
    }
}
