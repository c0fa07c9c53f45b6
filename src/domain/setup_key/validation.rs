//! Setup key validation utilities

use thiserror::Error;

use crate::domain::account::Account;
use crate::domain::DomainError;

/// Errors that can occur during setup key validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SetupKeyValidationError {
    #[error("group {0} doesn't exist")]
    GroupNotFound(String),

    #[error("can't add All group to the setup key")]
    AllGroupNotAllowed,

    #[error("unknown setup key type '{0}', expected 'reusable' or 'one-off'")]
    UnknownType(String),
}

impl From<SetupKeyValidationError> for DomainError {
    fn from(err: SetupKeyValidationError) -> Self {
        match err {
            SetupKeyValidationError::GroupNotFound(_) => DomainError::not_found(err.to_string()),
            SetupKeyValidationError::AllGroupNotAllowed
            | SetupKeyValidationError::UnknownType(_) => {
                DomainError::invalid_argument(err.to_string())
            }
        }
    }
}

/// Validate the auto-groups of a setup key against the account's groups
///
/// Rules:
/// - Every group must exist in the account
/// - The reserved "All" group is not allowed
///
/// Stops at the first offending group.
pub fn validate_auto_groups(
    account: &Account,
    auto_groups: &[String],
) -> Result<(), SetupKeyValidationError> {
    for group_id in auto_groups {
        let group = account
            .get_group(group_id)
            .ok_or_else(|| SetupKeyValidationError::GroupNotFound(group_id.clone()))?;

        if group.is_all() {
            return Err(SetupKeyValidationError::AllGroupNotAllowed);
        }
    }

    Ok(())
}
