//! Lazytree CLI Binary
//!
//! Command-line interface for the lazy-loading tree view.

use clap::Parser;
use lazytree::config::ConfigLoader;
use lazytree::logging::init_logging;
use lazytree::tooling::cli::{Cli, CliContext};
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = ConfigLoader::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    init_logging(&config.logging)?;

    let context = CliContext::from_config(config, cli.store.clone())?;
    let output = context.execute(&cli.command).await?;
    println!("{}", output);
    Ok(())
}
