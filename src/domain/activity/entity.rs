//! Activity event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::account::{AccountId, UserId};

/// Kind of audited setup key activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    SetupKeyCreated,
    SetupKeyRevoked,
    SetupKeyDeleted,
    GroupAddedToSetupKey,
    GroupRemovedFromSetupKey,
}

impl Activity {
    /// Stable event code
    pub fn code(&self) -> &'static str {
        match self {
            Self::SetupKeyCreated => "setupkey.add",
            Self::SetupKeyRevoked => "setupkey.revoke",
            Self::SetupKeyDeleted => "setupkey.delete",
            Self::GroupAddedToSetupKey => "setupkey.group.add",
            Self::GroupRemovedFromSetupKey => "setupkey.group.delete",
        }
    }

    /// Human readable description
    pub fn message(&self) -> &'static str {
        match self {
            Self::SetupKeyCreated => "Setup key created",
            Self::SetupKeyRevoked => "Setup key revoked",
            Self::SetupKeyDeleted => "Setup key deleted",
            Self::GroupAddedToSetupKey => "Group added to setup key",
            Self::GroupRemovedFromSetupKey => "Group removed from setup key",
        }
    }
}

impl std::fmt::Display for Activity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// An audit trail entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub timestamp: DateTime<Utc>,
    pub activity: Activity,
    /// User that performed the operation
    pub initiator_id: UserId,
    /// Object the operation was performed on
    pub target_id: String,
    pub account_id: AccountId,
    pub meta: Map<String, Value>,
}

impl ActivityEvent {
    pub fn new(
        activity: Activity,
        initiator_id: UserId,
        target_id: impl Into<String>,
        account_id: AccountId,
        meta: Map<String, Value>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            activity,
            initiator_id,
            target_id: target_id.into(),
            account_id,
            meta,
        }
    }
}
