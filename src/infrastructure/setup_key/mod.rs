//! Setup key infrastructure

mod generator;
mod service;

pub use generator::{GeneratedSetupKey, SetupKeyGenerator, SetupKeyParams};
pub use service::SetupKeyService;
