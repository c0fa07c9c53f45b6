//! Activity event store trait

use async_trait::async_trait;

use super::entity::ActivityEvent;
use crate::domain::error::DomainError;

#[cfg(test)]
use mockall::automock;

/// Persistence for the audit trail
#[cfg_attr(test, automock)]
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Persist one event
    async fn save(&self, event: ActivityEvent) -> Result<(), DomainError>;
}
