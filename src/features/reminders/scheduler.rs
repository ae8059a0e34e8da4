//! Periodic broadcast of outstanding reminders
//!
//! The first fire lands on the next top-of-hour boundary; after that the
//! scan repeats at the configured interval. There is no skip-if-behind: a
//! fire delayed by suspension happens immediately on resume and the schedule
//! continues at the fixed interval from that point rather than re-aligning
//! to :00.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.1.0: Shutdown signal so the loop is cancellable
//! - 1.0.0: Initial top-of-hour aligned broadcast loop

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Duration as ChronoDuration, Timelike, Utc};
use log::{debug, info, warn};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use super::notify::{NotificationItem, Notifier};
use super::service::ReminderService;

/// Recurring scan that re-notifies every recipient with active reminders.
pub struct BroadcastScheduler {
    service: ReminderService,
    interval: Duration,
}

impl BroadcastScheduler {
    pub fn new(service: ReminderService, interval_minutes: u64) -> Self {
        BroadcastScheduler {
            service,
            interval: Duration::from_secs(interval_minutes * 60),
        }
    }

    /// Time remaining until the next top-of-hour boundary.
    pub fn first_fire_delay(now: DateTime<Utc>) -> Duration {
        let this_hour = now
            .with_minute(0)
            .and_then(|t| t.with_second(0))
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(now);
        let next_hour = this_hour + ChronoDuration::hours(1);
        (next_hour - now).to_std().unwrap_or_default()
    }

    /// Run the timer loop until `shutdown` fires.
    ///
    /// The sender side of `shutdown` must stay alive for the process
    /// lifetime; dropping it stops the loop.
    pub async fn run(self, notifier: Arc<dyn Notifier>, mut shutdown: watch::Receiver<bool>) {
        let first = Self::first_fire_delay(Utc::now());
        info!(
            "First broadcast in {}s (top of the hour), then every {}s",
            first.as_secs(),
            self.interval.as_secs()
        );

        tokio::select! {
            _ = tokio::time::sleep(first) => {}
            _ = shutdown.changed() => {
                info!("Broadcast scheduler stopped before first fire");
                return;
            }
        }

        let mut ticker = tokio::time::interval(self.interval);
        // A late tick fires immediately and the next one is a full period
        // out, keeping the cadence anchored to the late fire.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.run_scan_once(notifier.as_ref()).await,
                _ = shutdown.changed() => {
                    info!("Broadcast scheduler stopped");
                    return;
                }
            }
        }
    }

    /// One full scan: a single best-effort send per recipient with active
    /// reminders. A failed send is logged and never blocks the rest of the
    /// fan-out; the reminders stay active, so the next cycle retries them.
    pub async fn run_scan_once(&self, notifier: &dyn Notifier) {
        let snapshot = self.service.broadcast_snapshot();
        if snapshot.is_empty() {
            debug!("Broadcast scan: nothing outstanding");
            return;
        }

        let mut delivered = 0usize;
        let mut failed = 0usize;
        for (recipient_id, entries) in snapshot {
            let items: Vec<NotificationItem> = entries
                .into_iter()
                .map(|e| NotificationItem {
                    id: e.id,
                    text: e.reminder.text,
                })
                .collect();

            match notifier.send_notification(&recipient_id, &items).await {
                Ok(()) => {
                    delivered += 1;
                    debug!("Sent {} reminder(s) to {recipient_id}", items.len());
                }
                Err(e) => {
                    failed += 1;
                    warn!("Failed to send reminders to {recipient_id}: {e}");
                }
            }
        }

        info!("Broadcast scan complete: {delivered} delivered, {failed} failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reminders::store::ReminderStore;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Records every send; fails for configured recipients.
    struct RecordingNotifier {
        sends: Mutex<Vec<(String, Vec<NotificationItem>)>>,
        fail_for: HashSet<String>,
    }

    impl RecordingNotifier {
        fn new() -> Self {
            RecordingNotifier {
                sends: Mutex::new(Vec::new()),
                fail_for: HashSet::new(),
            }
        }

        fn failing_for(recipients: &[&str]) -> Self {
            RecordingNotifier {
                sends: Mutex::new(Vec::new()),
                fail_for: recipients.iter().map(|r| r.to_string()).collect(),
            }
        }

        fn sent(&self) -> Vec<(String, Vec<NotificationItem>)> {
            self.sends.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send_notification(
            &self,
            recipient_id: &str,
            items: &[NotificationItem],
        ) -> anyhow::Result<()> {
            if self.fail_for.contains(recipient_id) {
                return Err(anyhow!("recipient unreachable"));
            }
            self.sends
                .lock()
                .unwrap()
                .push((recipient_id.to_string(), items.to_vec()));
            Ok(())
        }
    }

    fn service_with(dir: &tempfile::TempDir) -> ReminderService {
        let store = ReminderStore::new(dir.path().join("reminders.json"));
        ReminderService::load(store).unwrap()
    }

    #[test]
    fn test_first_fire_delay_mid_hour() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 15, 30).unwrap();
        assert_eq!(
            BroadcastScheduler::first_fire_delay(now),
            Duration::from_secs(44 * 60 + 30)
        );
    }

    #[test]
    fn test_first_fire_delay_on_the_hour_waits_full_hour() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        assert_eq!(
            BroadcastScheduler::first_fire_delay(now),
            Duration::from_secs(3600)
        );
    }

    #[test]
    fn test_first_fire_delay_just_before_boundary() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 59, 59).unwrap();
        assert_eq!(
            BroadcastScheduler::first_fire_delay(now),
            Duration::from_secs(1)
        );
    }

    #[tokio::test]
    async fn test_scan_skips_recipients_with_nothing_active() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with(&dir);
        service.add_reminder("U1", "a").unwrap();
        service.add_reminder("U1", "b").unwrap();
        service.add_reminder("U2", "done already").unwrap();
        service.acknowledge_by_ordinal("U2", 1).unwrap();
        service.add_reminder("U3", "c").unwrap();

        let notifier = RecordingNotifier::new();
        let scheduler = BroadcastScheduler::new(service, 60);
        scheduler.run_scan_once(&notifier).await;

        let sends = notifier.sent();
        assert_eq!(sends.len(), 2);
        assert_eq!(sends[0].0, "U1");
        assert_eq!(sends[0].1.len(), 2);
        assert_eq!(sends[1].0, "U3");
        assert_eq!(sends[1].1.len(), 1);
    }

    #[tokio::test]
    async fn test_scan_isolates_delivery_failures() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with(&dir);
        service.add_reminder("U1", "a").unwrap();
        service.add_reminder("U3", "c").unwrap();

        let notifier = RecordingNotifier::failing_for(&["U1"]);
        let scheduler = BroadcastScheduler::new(service.clone(), 60);
        scheduler.run_scan_once(&notifier).await;

        // U1's failure does not stop U3's delivery
        let sends = notifier.sent();
        assert_eq!(sends.len(), 1);
        assert_eq!(sends[0].0, "U3");

        // Failed delivery leaves the reminder active for the next cycle
        assert_eq!(service.list_active("U1").len(), 1);
    }

    #[tokio::test]
    async fn test_scan_carries_ack_ids() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with(&dir);
        service.add_reminder("U1", "Take vitamins").unwrap();
        service.add_reminder("U1", "Call mom").unwrap();
        service.acknowledge_by_ordinal("U1", 1).unwrap();

        let notifier = RecordingNotifier::new();
        let scheduler = BroadcastScheduler::new(service, 60);
        scheduler.run_scan_once(&notifier).await;

        // Only the still-active reminder goes out, carrying its real id
        let sends = notifier.sent();
        assert_eq!(sends.len(), 1);
        assert_eq!(
            sends[0].1,
            vec![NotificationItem {
                id: 2,
                text: "Call mom".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_empty_store_sends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with(&dir);

        let notifier = RecordingNotifier::new();
        let scheduler = BroadcastScheduler::new(service, 60);
        scheduler.run_scan_once(&notifier).await;

        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with(&dir);
        let scheduler = BroadcastScheduler::new(service, 60);
        let notifier: Arc<dyn Notifier> = Arc::new(RecordingNotifier::new());

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(scheduler.run(notifier, rx));
        tx.send(true).unwrap();

        // Loop observes the signal while waiting for the first fire
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("scheduler did not stop")
            .unwrap();
    }
}
