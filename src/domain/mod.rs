//! Domain layer - Core business logic and entities

pub mod account;
pub mod activity;
pub mod error;
pub mod setup_key;

pub use account::{
    Account, AccountId, AccountReadLock, AccountStore, AccountWriteLock, Group, User, UserId,
    UserRole,
};
pub use activity::{Activity, ActivityEvent, EventStore};
pub use error::DomainError;
pub use setup_key::{
    validate_auto_groups, InvalidSetupKey, SetupKey, SetupKeyId, SetupKeyType,
    SetupKeyValidationError,
};
