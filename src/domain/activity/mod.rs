//! Activity (audit trail) domain

mod entity;
mod repository;

pub use entity::{Activity, ActivityEvent};
pub use repository::EventStore;

#[cfg(test)]
pub use repository::MockEventStore;
