//! Account store trait

use std::fmt::Debug;

use async_trait::async_trait;
use tokio::sync::{OwnedRwLockReadGuard, OwnedRwLockWriteGuard};

use super::entity::{Account, AccountId};
use super::user::{User, UserId};
use crate::domain::setup_key::{SetupKey, SetupKeyId};
use crate::domain::DomainError;

/// Exclusive per-account lock, released when dropped
pub type AccountWriteLock = OwnedRwLockWriteGuard<()>;

/// Shared per-account lock, released when dropped
pub type AccountReadLock = OwnedRwLockReadGuard<()>;

/// Store for accounts and the setup keys and users they own
///
/// Mutating callers hold the exclusive account lock around the whole
/// read-modify-write sequence; readers hold the shared lock. The store itself
/// does not take these locks.
#[async_trait]
pub trait AccountStore: Send + Sync + Debug {
    /// Acquire the exclusive lock of an account
    async fn acquire_write_lock(&self, account_id: &AccountId) -> AccountWriteLock;

    /// Acquire the shared lock of an account
    async fn acquire_read_lock(&self, account_id: &AccountId) -> AccountReadLock;

    /// Get a snapshot of an account, NotFound if it does not exist
    async fn get_account(&self, account_id: &AccountId) -> Result<Account, DomainError>;

    /// Atomically replace an account
    async fn save_account(&self, account: &Account) -> Result<(), DomainError>;

    /// Get all setup keys of an account
    async fn get_account_setup_keys(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<SetupKey>, DomainError>;

    /// Get a setup key by its ID within an account
    async fn get_setup_key_by_id(
        &self,
        key_id: &SetupKeyId,
        account_id: &AccountId,
    ) -> Result<SetupKey, DomainError>;

    /// Remove a setup key from an account
    async fn delete_setup_key(
        &self,
        account_id: &AccountId,
        key_id: &SetupKeyId,
    ) -> Result<(), DomainError>;

    /// Get a user by ID; callers authorizing against an account hold its lock
    async fn get_user_by_id(&self, user_id: &UserId) -> Result<User, DomainError>;
}
