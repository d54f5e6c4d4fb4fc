use clap::Parser;
use doppel::config::Cli;
use doppel::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Convert CLI args to Config - this validates immediately
    let config = Config::try_from(cli)?;

    doppel::commands::mirror::run(config)?;

    Ok(())
}
