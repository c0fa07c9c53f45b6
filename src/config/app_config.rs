use chrono::Duration;
use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::Deserialize;

use crate::domain::setup_key::constants::{
    DEFAULT_MASK_LENGTH, DEFAULT_SETUP_KEY_NAME, DEFAULT_SETUP_KEY_VALIDITY_DAYS,
};
use crate::domain::setup_key::SetupKeyType;
use crate::domain::DomainError;
use crate::infrastructure::setup_key::{SetupKeyGenerator, SetupKeyParams};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub setup_keys: SetupKeyConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Defaults applied to generated setup keys
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SetupKeyConfig {
    /// Validity of the default key; zero means it never expires
    pub default_validity_days: i64,
    /// Number of mask characters shown after the secret prefix
    pub mask_length: usize,
    pub default_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for SetupKeyConfig {
    fn default() -> Self {
        Self {
            default_validity_days: DEFAULT_SETUP_KEY_VALIDITY_DAYS,
            mask_length: DEFAULT_MASK_LENGTH,
            default_name: DEFAULT_SETUP_KEY_NAME.to_string(),
        }
    }
}

impl SetupKeyConfig {
    /// Generator honoring the configured mask length
    pub fn generator(&self) -> SetupKeyGenerator {
        SetupKeyGenerator::new().with_mask_length(self.mask_length)
    }

    /// Parameters of the default (reusable, unlimited) key
    pub fn default_params(&self) -> Result<SetupKeyParams, DomainError> {
        let valid_for = Duration::try_days(self.default_validity_days.max(0)).ok_or_else(|| {
            DomainError::invalid_argument(format!(
                "default_validity_days {} out of range",
                self.default_validity_days
            ))
        })?;

        Ok(SetupKeyParams::new(&self.default_name, SetupKeyType::Reusable).with_valid_for(valid_for))
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false));

        Self::from_builder(builder)
    }

    /// Environment variables (`APP__SECTION__KEY`) override every other source
    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, config::ConfigError> {
        let config = builder
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
