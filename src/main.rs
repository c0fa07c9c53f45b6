use clap::Parser;
use setup_keys::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => cli::generate::run(args).await,
        Command::Inspect(args) => cli::inspect::run(args).await,
        Command::Demo => cli::demo::run().await,
    }
}
