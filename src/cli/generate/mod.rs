//! Generate command - mints a setup key without persisting it

use chrono::Duration;
use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::domain::setup_key::{SetupKey, SetupKeyType};
use crate::infrastructure::setup_key::SetupKeyParams;

/// Arguments for the generate command
#[derive(Args, Clone)]
pub struct GenerateArgs {
    /// Key name (defaults to the configured default name)
    #[arg(long)]
    pub name: Option<String>,

    /// Key type: reusable or one-off
    #[arg(long = "type", default_value = "reusable")]
    pub key_type: SetupKeyType,

    /// Days until the key expires, 0 for never (defaults to the configured validity)
    #[arg(long)]
    pub valid_for_days: Option<i64>,

    /// Maximum number of enrollments, 0 for unlimited
    #[arg(long, default_value_t = 0)]
    pub usage_limit: u32,

    /// Peers enrolled with this key are removed when they go offline
    #[arg(long)]
    pub ephemeral: bool,

    /// Auto-assigned group ID (repeatable)
    #[arg(long = "group")]
    pub groups: Vec<String>,
}

#[derive(Serialize)]
struct GenerateOutput {
    setup_key: SetupKey,
    plain_key: String,
}

/// Run the generate command
pub async fn run(args: GenerateArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();
    let defaults = &config.setup_keys;

    let valid_for_days = args
        .valid_for_days
        .unwrap_or(defaults.default_validity_days);
    anyhow::ensure!(valid_for_days >= 0, "--valid-for-days must not be negative");
    let valid_for = Duration::try_days(valid_for_days)
        .ok_or_else(|| anyhow::anyhow!("--valid-for-days {} out of range", valid_for_days))?;

    let params = SetupKeyParams::new(
        args.name.unwrap_or_else(|| defaults.default_name.clone()),
        args.key_type,
    )
    .with_valid_for(valid_for)
    .with_usage_limit(args.usage_limit)
    .with_ephemeral(args.ephemeral)
    .with_auto_groups(args.groups);

    let generated = defaults.generator().generate(&params)?;

    info!(
        key_id = %generated.setup_key.id(),
        key_type = %generated.setup_key.key_type(),
        "Generated setup key"
    );

    let output = GenerateOutput {
        setup_key: generated.setup_key,
        plain_key: generated.plain_key,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
