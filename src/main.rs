use clap::Parser;
use llm_catalog::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    cli::catalog::run(cli).await
}
