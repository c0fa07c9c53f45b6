//! Inspect command - derives the stored fields of a plaintext secret

use clap::Args;
use serde::Serialize;

use crate::infrastructure::setup_key::SetupKeyGenerator;

/// Arguments for the inspect command
#[derive(Args, Clone)]
pub struct InspectArgs {
    /// Plaintext setup key
    pub key: String,

    /// Stored digest to verify the key against
    #[arg(long)]
    pub verify: Option<String>,
}

#[derive(Serialize)]
struct InspectOutput {
    id: String,
    key: String,
    key_secret: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    matches: Option<bool>,
}

/// Run the inspect command
pub async fn run(args: InspectArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();
    let generator = config.setup_keys.generator();

    let output = InspectOutput {
        id: SetupKeyGenerator::key_id(&args.key).to_string(),
        key: SetupKeyGenerator::hash_key(&args.key),
        key_secret: generator.hidden_key(&args.key),
        matches: args
            .verify
            .as_deref()
            .map(|stored| SetupKeyGenerator::verify_key(&args.key, stored)),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
