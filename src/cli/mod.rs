//! CLI interface for onlywin-amm
//!
//! Provides subcommands for:
//! - `demo`: Drive one market through its full lifecycle in memory
//! - `fixtures`: List upcoming fixtures with implied win probabilities
//! - `config`: Show current configuration

mod demo;
mod fixtures;

pub use demo::DemoArgs;
pub use fixtures::FixturesArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "onlywin-amm")]
#[command(about = "Constant-product AMM engine for cricket match-winner prediction markets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drive one market through create, trade, lock, and settle
    Demo(DemoArgs),
    /// List upcoming fixtures from the odds feed
    Fixtures(FixturesArgs),
    /// Show current configuration
    Config,
}
