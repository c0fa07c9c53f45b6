//! Account users, as far as setup key authorization needs them

use serde::{Deserialize, Serialize};

use super::entity::AccountId;

/// User identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role of a user within its account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Owner,
    Admin,
    #[default]
    User,
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    account_id: AccountId,
    role: UserRole,
    /// Service users act on behalf of automation rather than a person
    #[serde(default)]
    is_service_user: bool,
}

impl User {
    pub fn new(id: UserId, account_id: AccountId, role: UserRole) -> Self {
        Self {
            id,
            account_id,
            role,
            is_service_user: false,
        }
    }

    /// Create a service user
    pub fn service(id: UserId, account_id: AccountId) -> Self {
        Self {
            id,
            account_id,
            role: UserRole::User,
            is_service_user: true,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Owner | UserRole::Admin)
    }

    pub fn is_service_user(&self) -> bool {
        self.is_service_user
    }

    pub fn is_admin_or_service_user(&self) -> bool {
        self.is_admin() || self.is_service_user
    }

    /// Check if the user may manage setup keys of the given account
    pub fn can_manage_setup_keys(&self, account_id: &AccountId) -> bool {
        self.is_admin_or_service_user() && &self.account_id == account_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles() {
        let account_id = AccountId::new("acc-1");

        let owner = User::new(UserId::new("u1"), account_id.clone(), UserRole::Owner);
        let admin = User::new(UserId::new("u2"), account_id.clone(), UserRole::Admin);
        let regular = User::new(UserId::new("u3"), account_id.clone(), UserRole::User);
        let service = User::service(UserId::new("u4"), account_id.clone());

        assert!(owner.is_admin_or_service_user());
        assert!(admin.is_admin_or_service_user());
        assert!(!regular.is_admin_or_service_user());
        assert!(service.is_admin_or_service_user());
        assert!(!service.is_admin());
    }

    #[test]
    fn test_can_manage_setup_keys_requires_same_account() {
        let admin = User::new(UserId::new("u1"), AccountId::new("acc-1"), UserRole::Admin);

        assert!(admin.can_manage_setup_keys(&AccountId::new("acc-1")));
        assert!(!admin.can_manage_setup_keys(&AccountId::new("acc-2")));
    }
}
