//! Draw samples from an ERGM distribution with fixed parameters,
//! writing network statistics and (optionally) the sampled networks.

use anyhow::Result;
use clap::Parser;
use ergm_ee::{run_simulation, SimConfig};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (keyword = value pairs, '#' comments)
    config_file: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let config = SimConfig::parse_file(&cli.config_file)?;
    run_simulation(&config)
}
