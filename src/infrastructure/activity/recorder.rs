//! Asynchronous activity recording
//!
//! Events are queued and handed to the event store by a single worker task,
//! so callers never wait for (or fail because of) audit persistence.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::domain::activity::{ActivityEvent, EventStore};

enum Command {
    Record(ActivityEvent),
    Flush(oneshot::Sender<()>),
}

/// Fire-and-forget handle to the activity worker
#[derive(Debug, Clone)]
pub struct ActivityRecorder {
    tx: mpsc::UnboundedSender<Command>,
}

impl ActivityRecorder {
    /// Spawn the worker on the current tokio runtime
    pub fn spawn(store: Arc<dyn EventStore>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(store, rx));
        Self { tx }
    }

    /// Queue an event for persistence
    pub fn record(&self, event: ActivityEvent) {
        debug!(
            activity = %event.activity,
            target_id = %event.target_id,
            account_id = %event.account_id,
            "Queueing activity event"
        );

        if self.tx.send(Command::Record(event)).is_err() {
            warn!("Activity worker is not running, event dropped");
        }
    }

    /// Wait until every event queued so far has been handed to the store
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();

        if self.tx.send(Command::Flush(done_tx)).is_err() {
            return;
        }

        let _ = done_rx.await;
    }
}

async fn run_worker(store: Arc<dyn EventStore>, mut rx: mpsc::UnboundedReceiver<Command>) {
    while let Some(command) = rx.recv().await {
        match command {
            Command::Record(event) => {
                let activity = event.activity;
                let target_id = event.target_id.clone();

                if let Err(e) = store.save(event).await {
                    warn!(
                        activity = %activity,
                        target_id = %target_id,
                        error = %e,
                        "Failed to store activity event"
                    );
                }
            }
            Command::Flush(done) => {
                let _ = done.send(());
            }
        }
    }

    debug!("Activity worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::{AccountId, UserId};
    use crate::domain::activity::{Activity, MockEventStore};
    use crate::domain::DomainError;
    use crate::infrastructure::activity::InMemoryEventStore;
    use serde_json::Map;

    fn create_event(activity: Activity, target: &str) -> ActivityEvent {
        ActivityEvent::new(
            activity,
            UserId::new("user-1"),
            target,
            AccountId::new("acc-1"),
            Map::new(),
        )
    }

    #[tokio::test]
    async fn test_events_are_stored_in_order() {
        let store = Arc::new(InMemoryEventStore::new());
        let recorder = ActivityRecorder::spawn(store.clone());

        recorder.record(create_event(Activity::SetupKeyCreated, "1"));
        recorder.record(create_event(Activity::GroupAddedToSetupKey, "1"));
        recorder.record(create_event(Activity::SetupKeyDeleted, "1"));
        recorder.flush().await;

        let activities: Vec<Activity> = store.events().await.iter().map(|e| e.activity).collect();
        assert_eq!(
            activities,
            vec![
                Activity::SetupKeyCreated,
                Activity::GroupAddedToSetupKey,
                Activity::SetupKeyDeleted
            ]
        );
    }

    #[tokio::test]
    async fn test_store_failure_does_not_stop_worker() {
        let mut store = MockEventStore::new();
        store
            .expect_save()
            .times(2)
            .returning(|event| match event.target_id.as_str() {
                "bad" => Err(DomainError::storage("disk full")),
                _ => Ok(()),
            });

        let recorder = ActivityRecorder::spawn(Arc::new(store));

        recorder.record(create_event(Activity::SetupKeyCreated, "bad"));
        recorder.record(create_event(Activity::SetupKeyCreated, "good"));
        recorder.flush().await;
    }

    #[tokio::test]
    async fn test_flush_without_events() {
        let store = Arc::new(InMemoryEventStore::new());
        let recorder = ActivityRecorder::spawn(store.clone());

        recorder.flush().await;
        assert!(store.events().await.is_empty());
    }
}
