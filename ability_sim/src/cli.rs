//! Command-line interface for the ability simulator

use clap::Parser;
use std::path::PathBuf;

/// Run a player ability against a simulated clock
#[derive(Parser, Debug)]
#[command(name = "ability_sim")]
#[command(about = "Run a player ability against a simulated clock")]
#[command(version)]
pub struct Args {
    /// Ability to simulate
    #[arg(long, default_value = "arcane_bolt")]
    pub ability: String,

    /// Buff titles to equip, may be repeated
    #[arg(long = "buff", value_name = "TITLE")]
    pub buffs: Vec<String>,

    /// Ability definitions TOML (defaults to the bundled set)
    #[arg(long, value_name = "FILE")]
    pub abilities: Option<PathBuf>,

    /// Buff catalog TOML (defaults to the bundled set)
    #[arg(long = "buff-catalog", value_name = "FILE")]
    pub buff_catalog: Option<PathBuf>,

    /// Simulated seconds
    #[arg(long, default_value = "30", value_parser = positive_seconds)]
    pub duration: f64,

    /// Seconds between polls
    #[arg(long, default_value = "0.1", value_parser = positive_seconds)]
    pub tick: f64,

    /// RNG seed for projectile lifetimes
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Down the second player at this time
    #[arg(long, value_name = "SECONDS")]
    pub down_at: Option<f64>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// List bundled abilities and buffs, then exit
    #[arg(long)]
    pub list: bool,
}

pub fn parse_args() -> Args {
    Args::parse()
}

/// A finite, strictly positive number of seconds
fn positive_seconds(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("'{}' must be a finite number of seconds above zero", s))
    }
}
