//! Command-line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use fivedraw_engine::logger::LogFormat;

#[derive(Parser, Debug)]
#[command(
    name = "fivedraw",
    version,
    about = "Five-card draw poker engine: simulations, interactive play and hand evaluation"
)]
pub struct FivedrawCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play many hands between agents and summarize the run
    Sim(SimArgs),
    /// Play hands at the terminal against agents
    Play(PlayArgs),
    /// Evaluate a hand, optionally against another
    Eval {
        /// Five card tokens, e.g. "AS KS QS JS TS"
        #[arg(long)]
        cards: String,
        /// Second hand to compare against
        #[arg(long)]
        against: Option<String>,
    },
    /// Show the resolved configuration and where each value came from
    Cfg {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Table rule flags shared by `sim` and `play`.
#[derive(Args, Debug, Clone, Default)]
pub struct RuleArgs {
    #[arg(long)]
    pub min_bet: Option<u32>,
    #[arg(long)]
    pub ante: Option<u32>,
    #[arg(long)]
    pub max_raises: Option<u32>,
    #[arg(long)]
    pub max_discards: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct SimArgs {
    #[arg(long)]
    pub games: Option<u64>,
    #[arg(long)]
    pub seed: Option<u64>,
    /// Comma separated `name:kind[:bet_mode]` entries
    #[arg(long)]
    pub agents: Option<String>,
    /// Starting stack for every seat
    #[arg(long)]
    pub initial_funds: Option<u32>,
    /// Per-seat starting stacks, e.g. "500,300"
    #[arg(long)]
    pub funds: Option<String>,
    #[command(flatten)]
    pub rules: RuleArgs,
    /// Write every hand result to this file
    #[arg(long)]
    pub log: Option<PathBuf>,
    #[arg(long, value_parser = clap::value_parser!(LogFormat))]
    pub log_format: Option<LogFormat>,
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Model name used for `model` seats and their cache keys
    #[arg(long)]
    pub model: Option<String>,
    /// Decision cache file for `model` seats
    #[arg(long)]
    pub cache: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct PlayArgs {
    #[arg(long, default_value_t = 1)]
    pub hands: u64,
    #[arg(long)]
    pub seed: Option<u64>,
    /// Opponents as `name:kind` entries; seat 0 is you
    #[arg(long, default_value = "heuristic")]
    pub opponents: String,
    /// Starting stack for every seat
    #[arg(long)]
    pub initial_funds: Option<u32>,
    #[command(flatten)]
    pub rules: RuleArgs,
    #[arg(long)]
    pub config: Option<PathBuf>,
}
