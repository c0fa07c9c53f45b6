//! Account (tenant) entity and groups

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::setup_key::{SetupKey, SetupKeyId, ALL_GROUP_NAME};

/// Account identifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Group of peers owned by an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    id: String,
    name: String,
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Create the reserved "All" group with a fresh ID
    pub fn all() -> Self {
        Self::new(Uuid::new_v4().to_string(), ALL_GROUP_NAME)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_all(&self) -> bool {
        self.name == ALL_GROUP_NAME
    }
}

/// Account entity - the unit of tenancy, locking and persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    id: AccountId,
    groups: HashMap<String, Group>,
    /// Setup keys indexed by their hashed secret
    setup_keys: HashMap<String, SetupKey>,
}

impl Account {
    /// Create a new account holding only the "All" group
    pub fn new(id: AccountId) -> Self {
        let all = Group::all();

        Self {
            id,
            groups: HashMap::from([(all.id().to_string(), all)]),
            setup_keys: HashMap::new(),
        }
    }

    /// Add a group (builder pattern)
    pub fn with_group(mut self, group: Group) -> Self {
        self.add_group(group);
        self
    }

    pub fn id(&self) -> &AccountId {
        &self.id
    }

    pub fn add_group(&mut self, group: Group) {
        self.groups.insert(group.id().to_string(), group);
    }

    pub fn remove_group(&mut self, group_id: &str) -> Option<Group> {
        self.groups.remove(group_id)
    }

    pub fn get_group(&self, group_id: &str) -> Option<&Group> {
        self.groups.get(group_id)
    }

    pub fn all_group(&self) -> Option<&Group> {
        self.groups.values().find(|g| g.is_all())
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn setup_keys(&self) -> impl Iterator<Item = &SetupKey> {
        self.setup_keys.values()
    }

    pub fn setup_key_count(&self) -> usize {
        self.setup_keys.len()
    }

    pub fn find_setup_key_by_id(&self, id: &SetupKeyId) -> Option<&SetupKey> {
        self.setup_keys.values().find(|k| k.id() == id)
    }

    pub fn find_setup_key_by_hash(&self, key_hash: &str) -> Option<&SetupKey> {
        self.setup_keys.get(key_hash)
    }

    /// Insert or replace a setup key, indexed by its hashed secret
    pub fn put_setup_key(&mut self, setup_key: SetupKey) {
        self.setup_keys
            .insert(setup_key.key().to_string(), setup_key);
    }

    pub fn remove_setup_key_by_id(&mut self, id: &SetupKeyId) -> Option<SetupKey> {
        let hash = self.find_setup_key_by_id(id)?.key().to_string();
        self.setup_keys.remove(&hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::setup_key::SetupKeyType;

    fn create_test_key(id: &str, hash: &str) -> SetupKey {
        SetupKey::new(SetupKeyId::new(id), hash, "ABCDE****", "key", SetupKeyType::Reusable)
    }

    #[test]
    fn test_new_account_has_all_group() {
        let account = Account::new(AccountId::new("acc-1"));

        let all = account.all_group().unwrap();
        assert!(all.is_all());
        assert_eq!(account.get_group(all.id()), Some(all));
        assert_eq!(account.groups().count(), 1);
    }

    #[test]
    fn test_setup_key_indexing() {
        let mut account = Account::new(AccountId::new("acc-1"));
        account.put_setup_key(create_test_key("1", "hash-1"));
        account.put_setup_key(create_test_key("2", "hash-2"));

        assert_eq!(account.setup_key_count(), 2);
        assert_eq!(
            account.find_setup_key_by_hash("hash-2").unwrap().id().as_str(),
            "2"
        );
        assert_eq!(
            account
                .find_setup_key_by_id(&SetupKeyId::new("1"))
                .unwrap()
                .key(),
            "hash-1"
        );
    }

    #[test]
    fn test_put_replaces_same_hash() {
        let mut account = Account::new(AccountId::new("acc-1"));
        account.put_setup_key(create_test_key("1", "hash-1"));
        account.put_setup_key(create_test_key("1", "hash-1").with_name("renamed"));

        assert_eq!(account.setup_key_count(), 1);
        assert_eq!(account.find_setup_key_by_hash("hash-1").unwrap().name(), "renamed");
    }

    #[test]
    fn test_remove_setup_key_by_id() {
        let mut account = Account::new(AccountId::new("acc-1"));
        account.put_setup_key(create_test_key("1", "hash-1"));

        assert!(account.remove_setup_key_by_id(&SetupKeyId::new("1")).is_some());
        assert!(account.remove_setup_key_by_id(&SetupKeyId::new("1")).is_none());
        assert_eq!(account.setup_key_count(), 0);
    }
}
