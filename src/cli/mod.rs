//! CLI module for the setup key tool
//!
//! Provides subcommands:
//! - `generate`: mint a setup key and print it with its plaintext secret
//! - `inspect`: derive the stored fields of a plaintext secret
//! - `demo`: walk through the setup key lifecycle against an in-memory store

pub mod demo;
pub mod generate;
pub mod inspect;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Setup keys - pre-authorized enrollment keys for machines
#[derive(Parser)]
#[command(name = "setup-keys")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a new setup key
    Generate(generate::GenerateArgs),

    /// Show the ID, digest and masked form of a plaintext secret
    Inspect(inspect::InspectArgs),

    /// Run the full lifecycle against an in-memory account
    Demo,
}

/// Load `.env`, the layered configuration and install logging
fn bootstrap() -> AppConfig {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    config
}
