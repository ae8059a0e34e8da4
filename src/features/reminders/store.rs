//! Reminder data model and durable snapshot storage
//!
//! The whole store lives in memory and is written back in full after every
//! mutation. The on-disk format is a single JSON document:
//! recipient id → `{ next_id, reminders: { id → reminder } }`.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Atomic save via temp file + rename
//! - 1.0.0: Initial creation with JSON snapshot load/save

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::ReminderError;

/// Identifier of a reminder, unique within its owning recipient.
///
/// Allocated from the recipient's monotonic counter, so ids never collide and
/// sorted-id order is creation order.
pub type ReminderId = u64;

/// A single pending task.
///
/// The id is the key of the owning map and is not duplicated here.
/// `last_reminded` is carried in the wire format for future backoff logic but
/// is never written after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub text: String,
    pub active: bool,
    pub created: DateTime<Utc>,
    pub last_reminded: Option<DateTime<Utc>>,
}

impl Reminder {
    /// A fresh, active reminder created now.
    pub fn new(text: impl Into<String>) -> Self {
        Reminder {
            text: text.into(),
            active: true,
            created: Utc::now(),
            last_reminded: None,
        }
    }
}

/// All reminders belonging to one recipient, plus the id counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientRecord {
    pub next_id: ReminderId,
    pub reminders: BTreeMap<ReminderId, Reminder>,
}

impl Default for RecipientRecord {
    fn default() -> Self {
        RecipientRecord {
            next_id: 1,
            reminders: BTreeMap::new(),
        }
    }
}

impl RecipientRecord {
    /// Take the next id from the counter.
    pub fn allocate_id(&mut self) -> ReminderId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Number of reminders not yet acknowledged.
    pub fn active_count(&self) -> usize {
        self.reminders.values().filter(|r| r.active).count()
    }

    /// Active reminders in creation order.
    pub fn active_iter(&self) -> impl Iterator<Item = (ReminderId, &Reminder)> {
        self.reminders
            .iter()
            .filter(|(_, r)| r.active)
            .map(|(id, r)| (*id, r))
    }
}

/// The full in-memory state: recipient id → that recipient's record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub recipients: BTreeMap<String, RecipientRecord>,
}

/// Durable snapshot storage for a [`Store`].
///
/// Pure persistence: no scheduling or lifecycle logic lives here.
#[derive(Debug)]
pub struct ReminderStore {
    path: PathBuf,
}

impl ReminderStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ReminderStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the durable state.
    ///
    /// A missing file yields an empty store; unreadable or unparseable data
    /// is a storage error.
    pub fn load(&self) -> Result<Store, ReminderError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Store::default()),
            Err(e) => return Err(e.into()),
        };
        let store = serde_json::from_str(&raw)?;
        Ok(store)
    }

    /// Overwrite the durable state with the full snapshot.
    ///
    /// Writes a sibling temp file first and renames it over the target, so a
    /// crash mid-write cannot leave a torn snapshot behind.
    pub fn save(&self, store: &Store) -> Result<(), ReminderError> {
        let raw = serde_json::to_string_pretty(store)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, raw)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
