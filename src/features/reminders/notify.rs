//! Messaging-endpoint seam for broadcast delivery
//!
//! The scheduler talks to the chat transport only through [`Notifier`], so
//! the scan logic can be exercised against an in-memory double and the
//! Discord wiring stays in the transport layer.

use anyhow::Result;
use async_trait::async_trait;

use super::store::ReminderId;

/// One reminder inside a notification: text to show plus the id an
/// acknowledgement action must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationItem {
    pub id: ReminderId,
    pub text: String,
}

/// Delivery of one notification per recipient.
///
/// Implementations render the items however the transport requires and
/// attach a per-item acknowledgement action addressed by
/// `(recipient_id, item.id)`. Errors are opaque to the caller: the scan
/// logs them and moves on.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_notification(&self, recipient_id: &str, items: &[NotificationItem])
        -> Result<()>;
}
