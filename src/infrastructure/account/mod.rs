//! Account store implementations

mod in_memory;
mod locks;

pub use in_memory::InMemoryAccountStore;
pub use locks::AccountLocks;
