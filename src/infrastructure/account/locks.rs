//! Per-account read/write locks

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::domain::account::{AccountId, AccountReadLock, AccountWriteLock};

/// Registry handing out one lock per account, created on first use
///
/// Entries nobody holds or waits on are dropped whenever a new account is
/// registered, so the map stays bounded by the accounts in use.
#[derive(Debug, Default)]
pub struct AccountLocks {
    locks: Mutex<HashMap<AccountId, Arc<RwLock<()>>>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    async fn lock_for(&self, account_id: &AccountId) -> Arc<RwLock<()>> {
        let mut locks = self.locks.lock().await;

        if let Some(lock) = locks.get(account_id) {
            return lock.clone();
        }

        // Guards and waiters keep their own reference to the lock
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);

        let lock = Arc::new(RwLock::new(()));
        locks.insert(account_id.clone(), lock.clone());
        lock
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }

    /// Acquire the exclusive lock of an account
    pub async fn write(&self, account_id: &AccountId) -> AccountWriteLock {
        let start = Instant::now();
        let guard = self.lock_for(account_id).await.write_owned().await;

        debug!(
            account_id = %account_id,
            waited_ms = start.elapsed().as_millis() as u64,
            "Acquired account write lock"
        );

        guard
    }

    /// Acquire the shared lock of an account
    pub async fn read(&self, account_id: &AccountId) -> AccountReadLock {
        let start = Instant::now();
        let guard = self.lock_for(account_id).await.read_owned().await;

        debug!(
            account_id = %account_id,
            waited_ms = start.elapsed().as_millis() as u64,
            "Acquired account read lock"
        );

        guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_readers_share_the_lock() {
        let locks = AccountLocks::new();
        let account_id = AccountId::new("acc-1");

        let first = locks.read(&account_id).await;
        let second = tokio::time::timeout(Duration::from_millis(100), locks.read(&account_id)).await;

        assert!(second.is_ok());
        drop(first);
    }

    #[tokio::test]
    async fn test_writer_is_exclusive() {
        let locks = AccountLocks::new();
        let account_id = AccountId::new("acc-1");

        let guard = locks.write(&account_id).await;

        let blocked = tokio::time::timeout(Duration::from_millis(50), locks.read(&account_id)).await;
        assert!(blocked.is_err());

        drop(guard);

        let acquired =
            tokio::time::timeout(Duration::from_millis(100), locks.write(&account_id)).await;
        assert!(acquired.is_ok());
    }

    #[tokio::test]
    async fn test_idle_entries_are_pruned() {
        let locks = AccountLocks::new();

        drop(locks.write(&AccountId::new("missing")).await);
        drop(locks.read(&AccountId::new("gone")).await);
        let held = locks.write(&AccountId::new("acc-1")).await;

        // Only the account with a live guard is left besides the new one
        let _other = locks.read(&AccountId::new("acc-2")).await;
        assert_eq!(locks.tracked().await, 2);

        drop(held);
        let _third = locks.read(&AccountId::new("acc-3")).await;
        assert_eq!(locks.tracked().await, 2);
    }

    #[tokio::test]
    async fn test_pruning_keeps_lock_identity_while_held() {
        let locks = AccountLocks::new();
        let account_id = AccountId::new("acc-1");

        let guard = locks.write(&account_id).await;
        drop(locks.read(&AccountId::new("acc-2")).await);
        let _other = locks.read(&AccountId::new("acc-3")).await;

        let blocked = tokio::time::timeout(Duration::from_millis(50), locks.read(&account_id)).await;
        assert!(blocked.is_err());

        drop(guard);
    }

    #[tokio::test]
    async fn test_accounts_do_not_block_each_other() {
        let locks = AccountLocks::new();

        let _first = locks.write(&AccountId::new("acc-1")).await;
        let second = tokio::time::timeout(
            Duration::from_millis(100),
            locks.write(&AccountId::new("acc-2")),
        )
        .await;

        assert!(second.is_ok());
    }
}
