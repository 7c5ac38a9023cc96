//! pdff-editor command line entry point.

mod cli;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before clap reads environment overrides
    dotenvy::dotenv().ok();

    let cli = cli::Cli::parse();
    cli.run().await
}
