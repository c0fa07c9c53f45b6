//! Setup key domain
//!
//! Setup keys are pre-shared credentials that let a machine enroll into an
//! account without interactive login. This module holds the entity, its
//! eligibility checks and auto-group validation.

pub mod constants;
mod entity;
mod validation;
mod validity;

pub use constants::{
    default_setup_key_duration, ALL_GROUP_NAME, DEFAULT_MASK_LENGTH, DEFAULT_SETUP_KEY_NAME,
    SETUP_KEY_UNLIMITED_USAGE,
};
pub use entity::{SetupKey, SetupKeyId, SetupKeyType};
pub use validation::{validate_auto_groups, SetupKeyValidationError};
pub use validity::InvalidSetupKey;
