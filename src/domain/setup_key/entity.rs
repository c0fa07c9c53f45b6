//! Setup key entity and related types

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::constants::ONE_OFF_USAGE_LIMIT;
use super::validation::SetupKeyValidationError;
use crate::domain::account::AccountId;

/// Setup key identifier, derived from the plaintext secret at creation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetupKeyId(String);

impl SetupKeyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SetupKeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of setup key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SetupKeyType {
    /// Can enroll any number of machines, up to its usage limit
    #[default]
    Reusable,
    /// Can enroll exactly one machine
    OneOff,
}

impl SetupKeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reusable => "reusable",
            Self::OneOff => "one-off",
        }
    }
}

impl std::fmt::Display for SetupKeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SetupKeyType {
    type Err = SetupKeyValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reusable" => Ok(Self::Reusable),
            "one-off" => Ok(Self::OneOff),
            other => Err(SetupKeyValidationError::UnknownType(other.to_string())),
        }
    }
}

/// Pre-authorized key used to enroll machines (peers) into an account
///
/// At rest `key` holds the base64 SHA-256 digest of the secret. The plaintext
/// only ever appears in the value returned by setup key creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupKey {
    id: SetupKeyId,
    /// Owning account, never exposed to API callers
    #[serde(skip_serializing, default)]
    account_id: AccountId,
    key: String,
    /// Masked preview of the secret, e.g. "831F6****"
    key_secret: String,
    name: String,
    #[serde(rename = "type")]
    key_type: SetupKeyType,
    created_at: DateTime<Utc>,
    /// None means the key never expires
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
    /// Absent on records written before updates were tracked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
    /// Revoked keys are kept for audit purposes rather than removed
    #[serde(default)]
    revoked: bool,
    #[serde(default)]
    used_times: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_used: Option<DateTime<Utc>>,
    /// Groups auto-assigned to peers enrolled with this key
    #[serde(default)]
    auto_groups: Vec<String>,
    /// Zero means unlimited
    #[serde(default)]
    usage_limit: u32,
    #[serde(default)]
    ephemeral: bool,
}

impl SetupKey {
    /// Create a new setup key from an already hashed secret
    pub fn new(
        id: SetupKeyId,
        key_hash: impl Into<String>,
        key_secret: impl Into<String>,
        name: impl Into<String>,
        key_type: SetupKeyType,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            account_id: AccountId::default(),
            key: key_hash.into(),
            key_secret: key_secret.into(),
            name: name.into(),
            key_type,
            created_at: now,
            expires_at: None,
            updated_at: Some(now),
            revoked: false,
            used_times: 0,
            last_used: None,
            auto_groups: Vec::new(),
            usage_limit: if key_type == SetupKeyType::OneOff {
                ONE_OFF_USAGE_LIMIT
            } else {
                0
            },
            ephemeral: false,
        }
    }

    /// Set the owning account
    pub fn with_account_id(mut self, account_id: AccountId) -> Self {
        self.account_id = account_id;
        self
    }

    /// Set expiration
    pub fn with_expiration(mut self, expires_at: Option<DateTime<Utc>>) -> Self {
        self.expires_at = expires_at;
        self
    }

    /// Set the usage limit; one-off keys always keep a limit of one
    pub fn with_usage_limit(mut self, usage_limit: u32) -> Self {
        self.usage_limit = match self.key_type {
            SetupKeyType::OneOff => ONE_OFF_USAGE_LIMIT,
            SetupKeyType::Reusable => usage_limit,
        };
        self
    }

    pub fn with_ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = ephemeral;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_auto_groups(mut self, auto_groups: Vec<String>) -> Self {
        self.auto_groups = auto_groups;
        self
    }

    pub fn with_revoked(mut self, revoked: bool) -> Self {
        self.revoked = revoked;
        self
    }

    /// Replace the stored digest with the plaintext secret for the creation response
    pub(crate) fn with_plain_key(mut self, plain_key: impl Into<String>) -> Self {
        self.key = plain_key.into();
        self
    }

    /// Mark the key as updated now
    pub fn touched(mut self) -> Self {
        self.updated_at = Some(Utc::now());
        self
    }

    /// Fill in a missing update timestamp from the creation time
    pub fn with_normalized_updated_at(mut self) -> Self {
        if self.updated_at.is_none() {
            self.updated_at = Some(self.created_at);
        }
        self
    }

    /// Copy of the key with one more recorded use
    pub fn increment_usage(&self) -> Self {
        let mut used = self.clone();
        used.used_times = used.used_times.saturating_add(1);
        used.last_used = Some(Utc::now());
        used
    }

    // Getters

    pub fn id(&self) -> &SetupKeyId {
        &self.id
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn key_secret(&self) -> &str {
        &self.key_secret
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key_type(&self) -> SetupKeyType {
        self.key_type
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn revoked(&self) -> bool {
        self.revoked
    }

    pub fn used_times(&self) -> u32 {
        self.used_times
    }

    pub fn last_used(&self) -> Option<DateTime<Utc>> {
        self.last_used
    }

    pub fn auto_groups(&self) -> &[String] {
        &self.auto_groups
    }

    pub fn usage_limit(&self) -> u32 {
        self.usage_limit
    }

    pub fn ephemeral(&self) -> bool {
        self.ephemeral
    }

    /// Activity event metadata describing this key
    pub fn event_meta(&self) -> Map<String, Value> {
        let mut meta = Map::new();
        meta.insert("name".to_string(), json!(self.name));
        meta.insert("type".to_string(), json!(self.key_type.as_str()));
        meta.insert("key".to_string(), json!(self.key_secret));
        meta
    }
}
