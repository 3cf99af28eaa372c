//! Command-line interface definitions.

pub mod analyze;
pub mod check;
pub mod matching;
pub mod output;
pub mod stack;
pub mod valuate;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::infrastructure::config::Config;

/// Dealforge - valuation and deal matching for M&A deal management.
#[derive(Parser, Debug)]
#[command(name = "dealforge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the ratio set and health score for a statement
    Analyze(AnalyzeArgs),

    /// Run the multi-methodology valuation for a deal
    Valuate(ValuateArgs),

    /// Generate a financing stack for a deal
    Stack(StackArgs),

    /// Rank a deal pool against a buyer mandate
    #[command(name = "match")]
    Match(MatchArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `dealforge check`
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate configuration file
    Config(ConfigPathArg),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file
    #[arg(short, long, default_value = "dealforge.toml")]
    pub config: PathBuf,
}

/// Arguments for the `analyze` subcommand.
#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "dealforge.toml")]
    pub config: PathBuf,

    /// Financial statement JSON file
    #[arg(long)]
    pub statement: PathBuf,

    /// Industry benchmarks JSON file for the health score
    #[arg(long)]
    pub benchmarks: Option<PathBuf>,
}

/// Arguments for the `valuate` subcommand.
#[derive(Parser, Debug)]
pub struct ValuateArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "dealforge.toml")]
    pub config: PathBuf,

    /// Deal profile JSON file
    #[arg(long)]
    pub deal: PathBuf,

    /// Financial statement JSON file
    #[arg(long)]
    pub statement: PathBuf,

    /// Reference snapshot JSON file (benchmarks, peers, transactions)
    #[arg(long)]
    pub reference: PathBuf,

    /// Override Monte Carlo iteration count
    #[arg(long)]
    pub iterations: Option<u32>,

    /// Override Monte Carlo seed
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Arguments for the `stack` subcommand.
#[derive(Parser, Debug)]
pub struct StackArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "dealforge.toml")]
    pub config: PathBuf,

    /// Deal profile JSON file
    #[arg(long)]
    pub deal: PathBuf,

    /// Financial statement JSON file
    #[arg(long)]
    pub statement: PathBuf,

    /// Reference snapshot JSON file
    #[arg(long)]
    pub reference: PathBuf,

    /// Stack constraints JSON file
    #[arg(long)]
    pub constraints: PathBuf,
}

/// Arguments for the `match` subcommand.
#[derive(Parser, Debug)]
pub struct MatchArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "dealforge.toml")]
    pub config: PathBuf,

    /// Buyer mandate JSON file
    #[arg(long)]
    pub buyer: PathBuf,

    /// Deal pool JSON file (array of deal profiles)
    #[arg(long)]
    pub deals: PathBuf,

    /// Maximum rows to print
    #[arg(long, default_value_t = 20)]
    pub limit: usize,
}

/// Load the config file if present, defaults otherwise.
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::load(path)
    } else {
        Ok(Config::default())
    }
}

/// Read and parse a JSON input file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
