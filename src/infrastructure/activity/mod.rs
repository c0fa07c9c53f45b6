//! Activity (audit trail) infrastructure

mod in_memory;
mod recorder;

pub use in_memory::InMemoryEventStore;
pub use recorder::ActivityRecorder;
