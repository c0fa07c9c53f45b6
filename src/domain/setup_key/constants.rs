//! Setup key defaults

use chrono::Duration;

/// Name given to the default setup key
pub const DEFAULT_SETUP_KEY_NAME: &str = "Default key";

/// Validity window of the default setup key, in days
pub const DEFAULT_SETUP_KEY_VALIDITY_DAYS: i64 = 30;

/// A usage limit of zero means the key can be used any number of times
pub const SETUP_KEY_UNLIMITED_USAGE: u32 = 0;

/// Effective usage limit of a one-off key
pub const ONE_OFF_USAGE_LIMIT: u32 = 1;

/// Number of plaintext characters kept visible in the masked secret
pub const SECRET_PREFIX_LENGTH: usize = 5;

/// Number of mask characters appended after the visible prefix
pub const DEFAULT_MASK_LENGTH: usize = 4;

pub const MASK_CHAR: char = '*';

/// Reserved group every peer belongs to; it can never be an auto-group
pub const ALL_GROUP_NAME: &str = "All";

/// Validity window of the default setup key
pub fn default_setup_key_duration() -> Duration {
    Duration::days(DEFAULT_SETUP_KEY_VALIDITY_DAYS)
}
