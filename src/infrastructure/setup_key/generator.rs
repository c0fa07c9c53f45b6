//! Setup key generation
//!
//! Mints random secrets and derives everything that is stored instead of
//! them: the SHA-256 digest, the masked preview and the numeric key ID.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Duration;
use rand::RngCore;
use sha2::{Digest, Sha256};
use uuid::Builder;

use crate::domain::setup_key::constants::{
    default_setup_key_duration, DEFAULT_MASK_LENGTH, DEFAULT_SETUP_KEY_NAME, MASK_CHAR,
    SECRET_PREFIX_LENGTH, SETUP_KEY_UNLIMITED_USAGE,
};
use crate::domain::setup_key::{SetupKey, SetupKeyId, SetupKeyType};
use crate::domain::DomainError;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Parameters of a setup key to generate
#[derive(Debug, Clone)]
pub struct SetupKeyParams {
    pub name: String,
    pub key_type: SetupKeyType,
    /// Zero means the key never expires
    pub valid_for: Duration,
    pub auto_groups: Vec<String>,
    /// Zero means unlimited; ignored for one-off keys
    pub usage_limit: u32,
    pub ephemeral: bool,
}

impl SetupKeyParams {
    /// Non-expiring, unlimited key without auto-groups
    pub fn new(name: impl Into<String>, key_type: SetupKeyType) -> Self {
        Self {
            name: name.into(),
            key_type,
            valid_for: Duration::zero(),
            auto_groups: Vec::new(),
            usage_limit: SETUP_KEY_UNLIMITED_USAGE,
            ephemeral: false,
        }
    }

    /// Reusable, unlimited key valid for 30 days
    pub fn default_key() -> Self {
        Self::new(DEFAULT_SETUP_KEY_NAME, SetupKeyType::Reusable)
            .with_valid_for(default_setup_key_duration())
    }

    pub fn with_valid_for(mut self, valid_for: Duration) -> Self {
        self.valid_for = valid_for;
        self
    }

    pub fn with_auto_groups(mut self, auto_groups: Vec<String>) -> Self {
        self.auto_groups = auto_groups;
        self
    }

    pub fn with_usage_limit(mut self, usage_limit: u32) -> Self {
        self.usage_limit = usage_limit;
        self
    }

    pub fn with_ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = ephemeral;
        self
    }
}

/// Result of generating a new setup key
#[derive(Debug, Clone)]
pub struct GeneratedSetupKey {
    /// The record to persist, holding only the hashed secret
    pub setup_key: SetupKey,
    /// The plaintext secret (only shown once at creation)
    pub plain_key: String,
}

/// Generator for setup keys
#[derive(Debug, Clone)]
pub struct SetupKeyGenerator {
    /// Number of mask characters in the displayed secret
    mask_length: usize,
}

impl SetupKeyGenerator {
    pub fn new() -> Self {
        Self {
            mask_length: DEFAULT_MASK_LENGTH,
        }
    }

    /// Set the number of mask characters
    pub fn with_mask_length(mut self, mask_length: usize) -> Self {
        self.mask_length = mask_length;
        self
    }

    /// Generate a new setup key
    ///
    /// Fails with `InvalidArgument` when the validity window puts the
    /// expiration outside the representable date range.
    pub fn generate(&self, params: &SetupKeyParams) -> Result<GeneratedSetupKey, DomainError> {
        self.from_secret(Self::random_secret(), params)
    }

    /// Generate the default setup key
    pub fn generate_default(&self) -> Result<GeneratedSetupKey, DomainError> {
        self.generate(&SetupKeyParams::default_key())
    }

    /// Build a setup key from a known secret (for testing purposes)
    pub fn from_secret(
        &self,
        plain_key: impl Into<String>,
        params: &SetupKeyParams,
    ) -> Result<GeneratedSetupKey, DomainError> {
        let plain_key = plain_key.into();

        let setup_key = SetupKey::new(
            Self::key_id(&plain_key),
            Self::hash_key(&plain_key),
            self.hidden_key(&plain_key),
            &params.name,
            params.key_type,
        )
        .with_usage_limit(params.usage_limit)
        .with_auto_groups(params.auto_groups.clone())
        .with_ephemeral(params.ephemeral);

        let expires_at = if params.valid_for == Duration::zero() {
            None
        } else {
            let expires_at = setup_key
                .created_at()
                .checked_add_signed(params.valid_for)
                .ok_or_else(|| DomainError::invalid_argument("validity window out of range"))?;
            Some(expires_at)
        };

        Ok(GeneratedSetupKey {
            setup_key: setup_key.with_expiration(expires_at),
            plain_key,
        })
    }

    /// Random 128-bit secret rendered as an uppercase UUID
    pub fn random_secret() -> String {
        let mut random_bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut random_bytes);

        Builder::from_random_bytes(random_bytes)
            .into_uuid()
            .to_string()
            .to_uppercase()
    }

    /// Hash a plaintext secret for storage
    pub fn hash_key(plain_key: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(plain_key.as_bytes());
        STANDARD.encode(hasher.finalize())
    }

    /// Verify a plaintext secret against a stored hash
    pub fn verify_key(plain_key: &str, stored_hash: &str) -> bool {
        constant_time_compare(&Self::hash_key(plain_key), stored_hash)
    }

    /// Key ID: 32-bit FNV-1a of the secret, in decimal
    ///
    /// IDs are not checked for collisions within an account.
    pub fn key_id(plain_key: &str) -> SetupKeyId {
        let mut hash = FNV_OFFSET_BASIS;
        for byte in plain_key.as_bytes() {
            hash ^= u32::from(*byte);
            hash = hash.wrapping_mul(FNV_PRIME);
        }

        SetupKeyId::new(hash.to_string())
    }

    /// Masked secret: the first characters followed by mask characters
    ///
    /// Never longer than the secret itself. Lengths count characters, not bytes.
    pub fn hidden_key(&self, plain_key: &str) -> String {
        let prefix: String = plain_key.chars().take(SECRET_PREFIX_LENGTH).collect();
        let remaining = plain_key.chars().count() - prefix.chars().count();
        let mask_length = self.mask_length.min(remaining);

        let mut hidden = prefix;
        hidden.extend(std::iter::repeat_n(MASK_CHAR, mask_length));
        hidden
    }
}

impl Default for SetupKeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Constant-time string comparison to prevent timing attacks
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
