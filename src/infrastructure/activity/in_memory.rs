//! In-memory event store implementation

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::activity::{Activity, ActivityEvent, EventStore};
use crate::domain::DomainError;

/// In-memory implementation of EventStore
///
/// Useful for testing and development. Events are lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    events: RwLock<Vec<ActivityEvent>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored events in arrival order
    pub async fn events(&self) -> Vec<ActivityEvent> {
        self.events.read().await.clone()
    }

    /// Stored events of one kind
    pub async fn events_of(&self, activity: Activity) -> Vec<ActivityEvent> {
        self.events
            .read()
            .await
            .iter()
            .filter(|e| e.activity == activity)
            .cloned()
            .collect()
    }

    pub async fn clear(&self) {
        self.events.write().await.clear();
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn save(&self, event: ActivityEvent) -> Result<(), DomainError> {
        self.events.write().await.push(event);
        Ok(())
    }
}
