//! Setup key service
//!
//! Create, update, read and delete setup keys of an account. Mutations hold
//! the account's exclusive lock from load to persist; reads hold the shared
//! lock. Audit events are queued after persistence and delivered
//! asynchronously, so a successful return does not imply the events are
//! stored yet.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::{json, Map};
use tracing::{debug, error, info};

use crate::domain::account::{Account, AccountId, AccountStore, UserId};
use crate::domain::activity::{Activity, ActivityEvent};
use crate::domain::setup_key::{validate_auto_groups, SetupKey, SetupKeyId};
use crate::domain::DomainError;
use crate::infrastructure::activity::ActivityRecorder;

use super::generator::{SetupKeyGenerator, SetupKeyParams};

/// Setup key service for managing setup keys
#[derive(Debug)]
pub struct SetupKeyService<S>
where
    S: AccountStore,
{
    store: Arc<S>,
    generator: SetupKeyGenerator,
    activity: ActivityRecorder,
}

impl<S: AccountStore> SetupKeyService<S> {
    /// Create a new setup key service
    pub fn new(store: Arc<S>, activity: ActivityRecorder) -> Self {
        Self {
            store,
            generator: SetupKeyGenerator::new(),
            activity,
        }
    }

    /// Create with a custom generator
    pub fn with_generator(mut self, generator: SetupKeyGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Create a setup key in an account
    ///
    /// The returned key carries the plaintext secret in `key`. This is the only
    /// time the secret is available; the account stores its hash.
    pub async fn create_setup_key(
        &self,
        account_id: &AccountId,
        params: SetupKeyParams,
        user_id: &UserId,
    ) -> Result<SetupKey, DomainError> {
        let lock = self.store.acquire_write_lock(account_id).await;

        let mut account = self.store.get_account(account_id).await?;
        validate_auto_groups(&account, &params.auto_groups)?;

        let generated = self.generator.generate(&params)?;
        let setup_key = generated.setup_key.with_account_id(account_id.clone());

        account.put_setup_key(setup_key.clone());

        if let Err(e) = self.store.save_account(&account).await {
            error!(account_id = %account_id, error = %e, "Failed to persist new setup key");
            return Err(DomainError::internal("failed adding setup key"));
        }

        drop(lock);

        info!(
            account_id = %account_id,
            key_id = %setup_key.id(),
            key_type = %setup_key.key_type(),
            "Setup key created"
        );

        self.activity.record(ActivityEvent::new(
            Activity::SetupKeyCreated,
            user_id.clone(),
            setup_key.id().as_str(),
            account_id.clone(),
            setup_key.event_meta(),
        ));

        for group_id in setup_key.auto_groups() {
            self.record_group_event(
                &account,
                Activity::GroupAddedToSetupKey,
                &setup_key,
                group_id,
                user_id,
            );
        }

        Ok(setup_key.with_plain_key(generated.plain_key))
    }

    /// Update a setup key
    ///
    /// Only the name, auto-groups and revoked flag are taken from `key_to_save`;
    /// every other field is kept from the stored key.
    pub async fn save_setup_key(
        &self,
        account_id: &AccountId,
        key_to_save: Option<SetupKey>,
        user_id: &UserId,
    ) -> Result<SetupKey, DomainError> {
        let key_to_save = key_to_save.ok_or_else(|| {
            DomainError::invalid_argument("provided setup key to update is nil")
        })?;

        let lock = self.store.acquire_write_lock(account_id).await;

        let mut account = self.store.get_account(account_id).await?;

        let old_key = account
            .find_setup_key_by_id(key_to_save.id())
            .cloned()
            .ok_or_else(|| DomainError::not_found("setup key not found"))?;

        validate_auto_groups(&account, key_to_save.auto_groups())?;

        let new_key = old_key
            .clone()
            .with_name(key_to_save.name())
            .with_auto_groups(key_to_save.auto_groups().to_vec())
            .with_revoked(key_to_save.revoked())
            .touched();

        account.put_setup_key(new_key.clone());
        self.store.save_account(&account).await?;

        drop(lock);

        info!(account_id = %account_id, key_id = %new_key.id(), "Setup key updated");

        if !old_key.revoked() && new_key.revoked() {
            self.activity.record(ActivityEvent::new(
                Activity::SetupKeyRevoked,
                user_id.clone(),
                new_key.id().as_str(),
                account_id.clone(),
                new_key.event_meta(),
            ));
        }

        // Queued now, delivered after the caller already has the result
        for group_id in difference(old_key.auto_groups(), new_key.auto_groups()) {
            self.record_group_event(
                &account,
                Activity::GroupRemovedFromSetupKey,
                &new_key,
                group_id,
                user_id,
            );
        }

        for group_id in difference(new_key.auto_groups(), old_key.auto_groups()) {
            self.record_group_event(
                &account,
                Activity::GroupAddedToSetupKey,
                &new_key,
                group_id,
                user_id,
            );
        }

        Ok(new_key)
    }

    /// List all setup keys of an account
    pub async fn list_setup_keys(
        &self,
        account_id: &AccountId,
        user_id: &UserId,
    ) -> Result<Vec<SetupKey>, DomainError> {
        let _lock = self.store.acquire_read_lock(account_id).await;

        self.authorize(account_id, user_id).await?;
        self.store.get_account_setup_keys(account_id).await
    }

    /// Get a setup key by ID
    pub async fn get_setup_key(
        &self,
        account_id: &AccountId,
        user_id: &UserId,
        key_id: &SetupKeyId,
    ) -> Result<SetupKey, DomainError> {
        let _lock = self.store.acquire_read_lock(account_id).await;

        self.authorize(account_id, user_id).await?;
        let setup_key = self.store.get_setup_key_by_id(key_id, account_id).await?;

        Ok(setup_key.with_normalized_updated_at())
    }

    /// Delete a setup key
    pub async fn delete_setup_key(
        &self,
        account_id: &AccountId,
        user_id: &UserId,
        key_id: &SetupKeyId,
    ) -> Result<(), DomainError> {
        let lock = self.store.acquire_write_lock(account_id).await;

        self.authorize(account_id, user_id).await?;

        let deleted = self
            .store
            .get_setup_key_by_id(key_id, account_id)
            .await
            .map_err(|e| e.context("failed to get setup key"))?;

        self.store
            .delete_setup_key(account_id, key_id)
            .await
            .map_err(|e| e.context("failed to delete setup key"))?;

        drop(lock);

        info!(account_id = %account_id, key_id = %key_id, "Setup key deleted");

        self.activity.record(ActivityEvent::new(
            Activity::SetupKeyDeleted,
            user_id.clone(),
            key_id.as_str(),
            account_id.clone(),
            deleted.event_meta(),
        ));

        Ok(())
    }

    /// Check that the user is an admin or service user of the account
    ///
    /// Callers hold the account lock, shared or exclusive.
    async fn authorize(&self, account_id: &AccountId, user_id: &UserId) -> Result<(), DomainError> {
        let user = self
            .store
            .get_user_by_id(user_id)
            .await
            .map_err(|e| e.context("failed to get user"))?;

        if !user.can_manage_setup_keys(account_id) {
            debug!(account_id = %account_id, user_id = %user_id, "User may not manage setup keys");
            return Err(DomainError::unauthorized_to_view_setup_keys());
        }

        Ok(())
    }

    fn record_group_event(
        &self,
        account: &Account,
        activity: Activity,
        setup_key: &SetupKey,
        group_id: &str,
        user_id: &UserId,
    ) {
        let Some(group) = account.get_group(group_id) else {
            error!(
                "group {} not found while saving setup key activity event of account {}",
                group_id,
                account.id()
            );
            return;
        };

        let mut meta = Map::new();
        meta.insert("group".to_string(), json!(group.name()));
        meta.insert("group_id".to_string(), json!(group.id()));
        meta.insert("setupkey".to_string(), json!(setup_key.name()));

        self.activity.record(ActivityEvent::new(
            activity,
            user_id.clone(),
            setup_key.id().as_str(),
            account.id().clone(),
            meta,
        ));
    }
}

/// Groups present in `a` but not in `b`, in the order of `a`
fn difference<'a>(a: &'a [String], b: &[String]) -> Vec<&'a str> {
    let exclude: HashSet<&str> = b.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();

    a.iter()
        .map(String::as_str)
        .filter(|g| !exclude.contains(g) && seen.insert(*g))
        .collect()
}
