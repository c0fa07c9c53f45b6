//! Setup Keys
//!
//! Pre-authorized enrollment keys for machines joining an account:
//! - Key generation: random secret, SHA-256 digest at rest, masked preview
//! - Validity checks: revocation, expiry and usage limits
//! - Lifecycle: create, update, list, get and delete under per-account locks
//! - Audit trail: activity events recorded asynchronously

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
