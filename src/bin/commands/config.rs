use anyhow::Result;
use clap::Args;
use matchgate::MatchgateConfig;

use super::print_json;

/// Arguments for the Config command
#[derive(Args)]
pub struct ConfigArgs {
    /// Output as JSON object (the API key is never included)
    #[clap(long)]
    pub json: bool,
}

pub fn run(config: &MatchgateConfig, args: ConfigArgs) -> Result<()> {
    if args.json {
        return print_json(config, true);
    }

    println!("{}", config.summary());
    Ok(())
}
