//! Reminder lifecycle operations
//!
//! All mutating operations follow the same shape: lock the shared store,
//! apply the change, write the full snapshot back, report the result. The
//! snapshot write happens under the same lock as the mutation, so concurrent
//! commands and the broadcast scan never interleave a half-applied state.
//! A failed write is reported to the caller without rolling back memory
//! (see DESIGN.md).
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.2.0: Broadcast snapshot for the scheduler scan
//! - 1.1.0: Id-addressed acknowledgement for button actions
//! - 1.0.0: Initial add/list/done/remove operations

use std::sync::{Arc, Mutex, MutexGuard};

use crate::core::ReminderError;

use super::store::{RecipientRecord, Reminder, ReminderId, ReminderStore, Store};

/// One row of a recipient's active view.
///
/// Ordinals are a presentation detail recomputed on every call: they shift
/// whenever an earlier reminder is acknowledged or removed, and are never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEntry {
    pub ordinal: usize,
    pub id: ReminderId,
    pub reminder: Reminder,
}

/// Result of a successful add.
#[derive(Debug, Clone)]
pub struct Added {
    pub id: ReminderId,
    pub reminder: Reminder,
    /// Active count after the add
    pub active_count: usize,
}

/// Result of a successful acknowledgement.
#[derive(Debug, Clone)]
pub struct Acknowledged {
    pub reminder: Reminder,
    /// Active count after the acknowledgement
    pub remaining: usize,
}

/// Parse user-supplied ordinal text.
///
/// Non-numeric input is a validation error; numeric-but-out-of-bounds values
/// (0, negatives, too large) are left for the range check so the user gets
/// told the current valid bound.
pub fn parse_ordinal(input: &str) -> Result<i64, ReminderError> {
    input.trim().parse().map_err(|_| ReminderError::InvalidOrdinal {
        input: input.trim().to_string(),
    })
}

/// Business logic over the shared reminder store.
///
/// Cheap to clone; all clones share the same in-memory state and durable
/// backing file.
#[derive(Clone)]
pub struct ReminderService {
    store: Arc<ReminderStore>,
    state: Arc<Mutex<Store>>,
}

impl ReminderService {
    /// Load durable state and wrap it for the process lifetime.
    pub fn load(store: ReminderStore) -> Result<Self, ReminderError> {
        let state = store.load()?;
        Ok(ReminderService {
            store: Arc::new(store),
            state: Arc::new(Mutex::new(state)),
        })
    }

    // A panic while holding the lock must not wedge every later command, so
    // poisoning is stripped rather than propagated.
    fn lock(&self) -> MutexGuard<'_, Store> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Create a reminder for this recipient.
    pub fn add_reminder(&self, recipient_id: &str, text: &str) -> Result<Added, ReminderError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ReminderError::EmptyText);
        }

        let mut state = self.lock();
        let record = state.recipients.entry(recipient_id.to_string()).or_default();
        let id = record.allocate_id();
        let reminder = Reminder::new(text);
        record.reminders.insert(id, reminder.clone());
        let active_count = record.active_count();

        self.store.save(&state)?;
        Ok(Added {
            id,
            reminder,
            active_count,
        })
    }

    /// The recipient's active view, numbered 1..N in creation order.
    pub fn list_active(&self, recipient_id: &str) -> Vec<ActiveEntry> {
        let state = self.lock();
        state
            .recipients
            .get(recipient_id)
            .map(active_entries)
            .unwrap_or_default()
    }

    /// Acknowledge the reminder at the given 1-based ordinal.
    pub fn acknowledge_by_ordinal(
        &self,
        recipient_id: &str,
        ordinal: i64,
    ) -> Result<Acknowledged, ReminderError> {
        let mut state = self.lock();
        let id = resolve_ordinal(state.recipients.get(recipient_id), ordinal)?;

        // resolve_ordinal only returns ids present in the record
        let record = state
            .recipients
            .get_mut(recipient_id)
            .ok_or(ReminderError::UnknownReminder { id })?;
        let reminder = record
            .reminders
            .get_mut(&id)
            .ok_or(ReminderError::UnknownReminder { id })?;
        reminder.active = false;
        let reminder = reminder.clone();
        let remaining = record.active_count();

        self.store.save(&state)?;
        Ok(Acknowledged { reminder, remaining })
    }

    /// Acknowledge a reminder addressed by id (button actions).
    ///
    /// Idempotent: acknowledging an already-inactive reminder succeeds again,
    /// tolerating double clicks and delivery retries.
    pub fn acknowledge_by_id(
        &self,
        recipient_id: &str,
        id: ReminderId,
    ) -> Result<Acknowledged, ReminderError> {
        let mut state = self.lock();
        let record = state
            .recipients
            .get_mut(recipient_id)
            .ok_or(ReminderError::UnknownReminder { id })?;
        let reminder = record
            .reminders
            .get_mut(&id)
            .ok_or(ReminderError::UnknownReminder { id })?;
        reminder.active = false;
        let reminder = reminder.clone();
        let remaining = record.active_count();

        self.store.save(&state)?;
        Ok(Acknowledged { reminder, remaining })
    }

    /// Delete the reminder at the given 1-based ordinal entirely.
    pub fn remove_by_ordinal(
        &self,
        recipient_id: &str,
        ordinal: i64,
    ) -> Result<Reminder, ReminderError> {
        let mut state = self.lock();
        let id = resolve_ordinal(state.recipients.get(recipient_id), ordinal)?;

        let record = state
            .recipients
            .get_mut(recipient_id)
            .ok_or(ReminderError::UnknownReminder { id })?;
        let reminder = record
            .reminders
            .remove(&id)
            .ok_or(ReminderError::UnknownReminder { id })?;

        self.store.save(&state)?;
        Ok(reminder)
    }

    /// Every recipient that has at least one active reminder, with their
    /// active views. Read-only: used by the broadcast scan.
    pub fn broadcast_snapshot(&self) -> Vec<(String, Vec<ActiveEntry>)> {
        let state = self.lock();
        state
            .recipients
            .iter()
            .filter_map(|(recipient_id, record)| {
                let entries = active_entries(record);
                if entries.is_empty() {
                    None
                } else {
                    Some((recipient_id.clone(), entries))
                }
            })
            .collect()
    }

    /// Clone of the full in-memory state (test support and diagnostics).
    pub fn snapshot(&self) -> Store {
        self.lock().clone()
    }
}

fn active_entries(record: &RecipientRecord) -> Vec<ActiveEntry> {
    record
        .active_iter()
        .enumerate()
        .map(|(i, (id, reminder))| ActiveEntry {
            ordinal: i + 1,
            id,
            reminder: reminder.clone(),
        })
        .collect()
}

fn resolve_ordinal(
    record: Option<&RecipientRecord>,
    ordinal: i64,
) -> Result<ReminderId, ReminderError> {
    let active: Vec<ReminderId> = record
        .map(|r| r.active_iter().map(|(id, _)| id).collect())
        .unwrap_or_default();
    if ordinal < 1 || ordinal as usize > active.len() {
        return Err(ReminderError::OrdinalOutOfRange {
            ordinal,
            count: active.len(),
        });
    }
    Ok(active[ordinal as usize - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> (ReminderService, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = ReminderStore::new(dir.path().join("reminders.json"));
        (ReminderService::load(store).unwrap(), dir)
    }

    #[test]
    fn test_add_then_list() {
        let (service, _dir) = service();

        let before = service.list_active("U1").len();
        let added = service.add_reminder("U1", "Take vitamins").unwrap();
        assert_eq!(added.reminder.text, "Take vitamins");
        assert!(added.reminder.active);
        assert_eq!(added.active_count, before + 1);

        let list = service.list_active("U1");
        assert_eq!(list.len(), before + 1);
        assert_eq!(list[0].ordinal, 1);
        assert_eq!(list[0].reminder.text, "Take vitamins");
    }

    #[test]
    fn test_add_allocates_unique_ids() {
        let (service, _dir) = service();
        let a = service.add_reminder("U1", "one").unwrap();
        let b = service.add_reminder("U1", "two").unwrap();
        let c = service.add_reminder("U1", "three").unwrap();
        assert!(a.id != b.id && b.id != c.id && a.id != c.id);
    }

    #[test]
    fn test_add_rejects_blank_text() {
        let (service, _dir) = service();
        assert!(matches!(
            service.add_reminder("U1", ""),
            Err(ReminderError::EmptyText)
        ));
        assert!(matches!(
            service.add_reminder("U1", "   \t"),
            Err(ReminderError::EmptyText)
        ));
        assert!(service.list_active("U1").is_empty());
    }

    #[test]
    fn test_acknowledge_shifts_later_ordinals() {
        let (service, _dir) = service();
        service.add_reminder("U1", "Take vitamins").unwrap();
        service.add_reminder("U1", "Call mom").unwrap();
        service.add_reminder("U1", "Drink water").unwrap();

        let ack = service.acknowledge_by_ordinal("U1", 1).unwrap();
        assert_eq!(ack.reminder.text, "Take vitamins");
        assert_eq!(ack.remaining, 2);

        let list = service.list_active("U1");
        assert_eq!(list.len(), 2);
        assert_eq!((list[0].ordinal, list[0].reminder.text.as_str()), (1, "Call mom"));
        assert_eq!((list[1].ordinal, list[1].reminder.text.as_str()), (2, "Drink water"));
    }

    #[test]
    fn test_acknowledged_reminder_is_retained() {
        let (service, _dir) = service();
        service.add_reminder("U1", "task").unwrap();
        service.acknowledge_by_ordinal("U1", 1).unwrap();

        // Still in the record, just inactive
        let state = service.snapshot();
        let record = &state.recipients["U1"];
        assert_eq!(record.reminders.len(), 1);
        assert!(!record.reminders[&1].active);
    }

    #[test]
    fn test_acknowledge_by_id_is_idempotent() {
        let (service, _dir) = service();
        let added = service.add_reminder("U1", "water the plants").unwrap();

        let first = service.acknowledge_by_id("U1", added.id).unwrap();
        assert_eq!(first.remaining, 0);
        let second = service.acknowledge_by_id("U1", added.id).unwrap();
        assert_eq!(second.remaining, 0);

        let state = service.snapshot();
        assert_eq!(state.recipients["U1"].reminders.len(), 1);
    }

    #[test]
    fn test_acknowledge_by_id_wrong_recipient() {
        let (service, _dir) = service();
        let added = service.add_reminder("U1", "mine").unwrap();

        assert!(matches!(
            service.acknowledge_by_id("U2", added.id),
            Err(ReminderError::UnknownReminder { .. })
        ));
        // U1's reminder untouched
        assert_eq!(service.list_active("U1").len(), 1);
    }

    #[test]
    fn test_remove_deletes_entirely() {
        let (service, _dir) = service();
        service.add_reminder("U1", "keep").unwrap();
        service.add_reminder("U1", "drop").unwrap();

        let removed = service.remove_by_ordinal("U1", 2).unwrap();
        assert_eq!(removed.text, "drop");

        let list = service.list_active("U1");
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].reminder.text, "keep");

        let state = service.snapshot();
        assert_eq!(state.recipients["U1"].reminders.len(), 1);
    }

    #[test]
    fn test_out_of_range_leaves_store_unchanged() {
        let (service, _dir) = service();
        service.add_reminder("U1", "only one").unwrap();
        let before = service.snapshot();

        for ordinal in [0, 2, -3] {
            assert!(matches!(
                service.acknowledge_by_ordinal("U1", ordinal),
                Err(ReminderError::OrdinalOutOfRange { count: 1, .. })
            ));
            assert!(matches!(
                service.remove_by_ordinal("U1", ordinal),
                Err(ReminderError::OrdinalOutOfRange { count: 1, .. })
            ));
        }

        assert_eq!(service.snapshot(), before);
    }

    #[test]
    fn test_ordinal_resolves_against_active_view_only() {
        let (service, _dir) = service();
        service.add_reminder("U1", "first").unwrap();
        service.add_reminder("U1", "second").unwrap();
        service.acknowledge_by_ordinal("U1", 1).unwrap();

        // "second" is now ordinal 1; the inactive "first" no longer counts
        let ack = service.acknowledge_by_ordinal("U1", 1).unwrap();
        assert_eq!(ack.reminder.text, "second");
    }

    #[test]
    fn test_parse_ordinal() {
        assert_eq!(parse_ordinal("1").unwrap(), 1);
        assert_eq!(parse_ordinal(" 12 ").unwrap(), 12);
        assert_eq!(parse_ordinal("-3").unwrap(), -3);
        assert!(matches!(
            parse_ordinal("two"),
            Err(ReminderError::InvalidOrdinal { .. })
        ));
        assert!(matches!(
            parse_ordinal(""),
            Err(ReminderError::InvalidOrdinal { .. })
        ));
        assert!(matches!(
            parse_ordinal("1.5"),
            Err(ReminderError::InvalidOrdinal { .. })
        ));
    }

    #[test]
    fn test_broadcast_snapshot_skips_all_done_recipients() {
        let (service, _dir) = service();
        service.add_reminder("U1", "a").unwrap();
        service.add_reminder("U1", "b").unwrap();
        service.add_reminder("U2", "c").unwrap();
        service.acknowledge_by_ordinal("U2", 1).unwrap();
        service.add_reminder("U3", "d").unwrap();

        let snapshot = service.broadcast_snapshot();
        let recipients: Vec<&str> = snapshot.iter().map(|(r, _)| r.as_str()).collect();
        assert_eq!(recipients, vec!["U1", "U3"]);
        assert_eq!(snapshot[0].1.len(), 2);
        assert_eq!(snapshot[1].1.len(), 1);
    }

    #[test]
    fn test_mutations_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reminders.json");

        {
            let service = ReminderService::load(ReminderStore::new(&path)).unwrap();
            service.add_reminder("U1", "persisted").unwrap();
            service.add_reminder("U1", "acknowledged").unwrap();
            service.acknowledge_by_ordinal("U1", 2).unwrap();
        }

        let reopened = ReminderService::load(ReminderStore::new(&path)).unwrap();
        let list = reopened.list_active("U1");
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].reminder.text, "persisted");
        // Counter continues where it left off
        let next = reopened.add_reminder("U1", "third").unwrap();
        assert_eq!(next.id, 3);
    }
}
