mod application;
mod cli;
mod data;
mod domain;
mod imaging;
mod infra;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use tracing_subscriber::filter::Directive;

fn main() -> Result<()> {
    let default_directive: Directive = "food_dataset_prep=info".parse()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_directive),
        )
        .init();

    let cli = Cli::parse();
    cli.run()
}
