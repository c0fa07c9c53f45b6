//! Account domain module
//!
//! Accounts are the tenants setup keys belong to. Groups and users are
//! modelled only as far as setup key validation and authorization need them.

mod entity;
mod repository;
mod user;

pub use entity::{Account, AccountId, Group};
pub use repository::{AccountReadLock, AccountStore, AccountWriteLock};
pub use user::{User, UserId, UserRole};
