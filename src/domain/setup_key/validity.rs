//! Setup key eligibility checks
//!
//! Pure predicates over a key snapshot. The enrollment flow consults these
//! before it lets a key register a new peer.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::constants::ONE_OFF_USAGE_LIMIT;
use super::entity::{SetupKey, SetupKeyType};

/// Reason a setup key can not be used for enrollment
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvalidSetupKey {
    #[error("setup key was revoked")]
    Revoked,

    #[error("setup key has expired")]
    Expired,

    #[error("setup key reached its usage limit")]
    OverUsed,
}

impl SetupKey {
    pub fn is_revoked(&self) -> bool {
        self.revoked()
    }

    /// Check if the key has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Check expiry against a given instant; keys without expiry never expire
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at() {
            Some(expires_at) => now > expires_at,
            None => false,
        }
    }

    /// Usage limit that actually applies; zero means unlimited
    pub fn effective_usage_limit(&self) -> u32 {
        match self.key_type() {
            SetupKeyType::OneOff => ONE_OFF_USAGE_LIMIT,
            SetupKeyType::Reusable => self.usage_limit(),
        }
    }

    pub fn is_over_used(&self) -> bool {
        let limit = self.effective_usage_limit();
        limit > 0 && self.used_times() >= limit
    }

    /// Check if the key is not revoked, not expired and not over used
    pub fn is_valid(&self) -> bool {
        self.check().is_ok()
    }

    /// Same as `is_valid`, reporting the first failing condition
    pub fn check(&self) -> Result<(), InvalidSetupKey> {
        if self.is_revoked() {
            return Err(InvalidSetupKey::Revoked);
        }

        if self.is_expired() {
            return Err(InvalidSetupKey::Expired);
        }

        if self.is_over_used() {
            return Err(InvalidSetupKey::OverUsed);
        }

        Ok(())
    }
}
