//! In-memory account store implementation

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::locks::AccountLocks;
use crate::domain::account::{
    Account, AccountId, AccountReadLock, AccountStore, AccountWriteLock, User, UserId,
};
use crate::domain::setup_key::{SetupKey, SetupKeyId};
use crate::domain::DomainError;

/// In-memory implementation of AccountStore
///
/// Data is lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<AccountId, Account>>,
    users: RwLock<HashMap<UserId, User>>,
    locks: AccountLocks,
    fail_writes: RwLock<bool>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with initial accounts and users
    pub fn with_data(accounts: Vec<Account>, users: Vec<User>) -> Self {
        Self {
            accounts: RwLock::new(
                accounts
                    .into_iter()
                    .map(|a| (a.id().clone(), a))
                    .collect(),
            ),
            users: RwLock::new(users.into_iter().map(|u| (u.id().clone(), u)).collect()),
            ..Self::default()
        }
    }

    pub async fn insert_account(&self, account: Account) {
        self.accounts
            .write()
            .await
            .insert(account.id().clone(), account);
    }

    pub async fn insert_user(&self, user: User) {
        self.users.write().await.insert(user.id().clone(), user);
    }

    /// Set whether writes should fail
    pub async fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.write().await = fail;
    }

    async fn check_fail_writes(&self) -> Result<(), DomainError> {
        if *self.fail_writes.read().await {
            return Err(DomainError::storage("Account store configured to fail"));
        }
        Ok(())
    }

    fn account_not_found(account_id: &AccountId) -> DomainError {
        DomainError::not_found(format!("account {} not found", account_id))
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn acquire_write_lock(&self, account_id: &AccountId) -> AccountWriteLock {
        self.locks.write(account_id).await
    }

    async fn acquire_read_lock(&self, account_id: &AccountId) -> AccountReadLock {
        self.locks.read(account_id).await
    }

    async fn get_account(&self, account_id: &AccountId) -> Result<Account, DomainError> {
        self.accounts
            .read()
            .await
            .get(account_id)
            .cloned()
            .ok_or_else(|| Self::account_not_found(account_id))
    }

    async fn save_account(&self, account: &Account) -> Result<(), DomainError> {
        self.check_fail_writes().await?;

        self.accounts
            .write()
            .await
            .insert(account.id().clone(), account.clone());
        Ok(())
    }

    async fn get_account_setup_keys(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<SetupKey>, DomainError> {
        let accounts = self.accounts.read().await;
        let account = accounts
            .get(account_id)
            .ok_or_else(|| Self::account_not_found(account_id))?;

        Ok(account.setup_keys().cloned().collect())
    }

    async fn get_setup_key_by_id(
        &self,
        key_id: &SetupKeyId,
        account_id: &AccountId,
    ) -> Result<SetupKey, DomainError> {
        let accounts = self.accounts.read().await;
        let account = accounts
            .get(account_id)
            .ok_or_else(|| Self::account_not_found(account_id))?;

        account
            .find_setup_key_by_id(key_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("setup key {} not found", key_id)))
    }

    async fn delete_setup_key(
        &self,
        account_id: &AccountId,
        key_id: &SetupKeyId,
    ) -> Result<(), DomainError> {
        self.check_fail_writes().await?;

        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(account_id)
            .ok_or_else(|| Self::account_not_found(account_id))?;

        account
            .remove_setup_key_by_id(key_id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found(format!("setup key {} not found", key_id)))
    }

    async fn get_user_by_id(&self, user_id: &UserId) -> Result<User, DomainError> {
        self.users
            .read()
            .await
            .get(user_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("user {} not found", user_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::UserRole;
    use crate::domain::setup_key::SetupKeyType;

    fn create_account_with_key(account_id: &str, key_id: &str) -> Account {
        let mut account = Account::new(AccountId::new(account_id));
        account.put_setup_key(SetupKey::new(
            SetupKeyId::new(key_id),
            format!("hash-{}", key_id),
            "ABCDE****",
            "key",
            SetupKeyType::Reusable,
        ));
        account
    }

    #[tokio::test]
    async fn test_get_missing_account() {
        let store = InMemoryAccountStore::new();

        let err = store.get_account(&AccountId::new("nope")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_save_replaces_account() {
        let store = InMemoryAccountStore::new();
        let account = create_account_with_key("acc-1", "1");
        store.save_account(&account).await.unwrap();

        let mut loaded = store.get_account(account.id()).await.unwrap();
        loaded.put_setup_key(SetupKey::new(
            SetupKeyId::new("2"),
            "hash-2",
            "ABCDE****",
            "other",
            SetupKeyType::OneOff,
        ));

        // Snapshots are detached until saved
        assert_eq!(store.get_account_setup_keys(account.id()).await.unwrap().len(), 1);

        store.save_account(&loaded).await.unwrap();
        assert_eq!(store.get_account_setup_keys(account.id()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_get_setup_key_is_scoped_to_account() {
        let store = InMemoryAccountStore::with_data(
            vec![
                create_account_with_key("acc-1", "1"),
                create_account_with_key("acc-2", "2"),
            ],
            vec![],
        );

        assert!(store
            .get_setup_key_by_id(&SetupKeyId::new("1"), &AccountId::new("acc-1"))
            .await
            .is_ok());
        assert!(store
            .get_setup_key_by_id(&SetupKeyId::new("1"), &AccountId::new("acc-2"))
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_delete_setup_key() {
        let store = InMemoryAccountStore::with_data(vec![create_account_with_key("acc-1", "1")], vec![]);
        let account_id = AccountId::new("acc-1");
        let key_id = SetupKeyId::new("1");

        store.delete_setup_key(&account_id, &key_id).await.unwrap();
        assert!(store.get_account_setup_keys(&account_id).await.unwrap().is_empty());

        let err = store.delete_setup_key(&account_id, &key_id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_fail_writes() {
        let store = InMemoryAccountStore::with_data(vec![create_account_with_key("acc-1", "1")], vec![]);
        let account_id = AccountId::new("acc-1");
        store.set_fail_writes(true).await;

        let account = store.get_account(&account_id).await.unwrap();
        assert!(matches!(
            store.save_account(&account).await,
            Err(DomainError::Storage { .. })
        ));
        assert!(store
            .delete_setup_key(&account_id, &SetupKeyId::new("1"))
            .await
            .is_err());
        assert_eq!(store.get_account_setup_keys(&account_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_user_by_id() {
        let store = InMemoryAccountStore::new();
        store
            .insert_user(User::new(
                UserId::new("admin"),
                AccountId::new("acc-1"),
                UserRole::Admin,
            ))
            .await;

        let user = store.get_user_by_id(&UserId::new("admin")).await.unwrap();
        assert!(user.is_admin());
        assert!(store
            .get_user_by_id(&UserId::new("ghost"))
            .await
            .unwrap_err()
            .is_not_found());
    }
}
