//! Simulation command handler.
//!
//! Plays `games` hands on one table, optionally logging every result, and
//! prints a text summary followed by the same summary as JSON.
//!
//! # Examples
//!
//! ```no_run
//! use fivedraw_cli::cli::SimArgs;
//! use fivedraw_cli::commands::sim::handle_sim_command;
//! # fn args() -> SimArgs { unimplemented!() }
//! let env = |k: &str| std::env::var(k).ok();
//! handle_sim_command(&args(), &mut std::io::stdout(), &mut std::io::stderr(), &env).unwrap();
//! ```

use std::collections::BTreeMap;
use std::io::Write;

use fivedraw_engine::engine::Table;
use fivedraw_engine::logger::GameLogger;
use fivedraw_engine::player::Controller;
use tracing::{debug, info};

use crate::agents::{build_seats, ModelOptions};
use crate::cli::SimArgs;
use crate::config::{load_with_sources, Overrides};
use crate::error::CliError;
use crate::stats::{SimSummary, StatsCollector};
use crate::ui;
use crate::validation::parse_funds;

fn overrides(args: &SimArgs) -> Overrides {
    Overrides {
        games: args.games,
        seed: args.seed,
        agents: args.agents.clone(),
        initial_funds: args.initial_funds,
        min_bet: args.rules.min_bet,
        ante: args.rules.ante,
        max_raises: args.rules.max_raises,
        max_discards: args.rules.max_discards,
        log_format: args.log_format,
    }
}

/// Runs the simulation and returns its summary after printing it.
pub fn handle_sim_command(
    args: &SimArgs,
    out: &mut dyn Write,
    err: &mut dyn Write,
    env: &dyn Fn(&str) -> Option<String>,
) -> Result<SimSummary, CliError> {
    let resolved = load_with_sources(args.config.as_deref(), env, &overrides(args))?;
    let cfg = resolved.config;
    let specs = cfg.agent_specs()?;

    let funds = match &args.funds {
        Some(list) => parse_funds(list, specs.len()).map_err(CliError::InvalidInput)?,
        None => vec![cfg.initial_funds; specs.len()],
    };
    let mut opts = ModelOptions::default();
    if let Some(model) = &args.model {
        opts.model = model.clone();
    }
    opts.cache = args.cache.clone();

    let seats = build_seats(&specs, &funds, &opts)?;
    let seed = cfg.seed.unwrap_or_else(rand::random);
    let mut table = Table::new(seats, cfg.rules(), Some(seed))?;
    let mut stats = StatsCollector::new(table.seats());

    let mut logger = match &args.log {
        Some(path) => Some(GameLogger::create(path, cfg.log_format)?),
        None => None,
    };

    info!(games = cfg.games, seed, seats = specs.len(), "simulation started");
    for game_id in 1..=cfg.games {
        let result = table.play_hand(game_id)?;
        if result.is_idle() {
            debug!(game_id, "fewer than two funded seats, hand skipped");
        }
        if let Some(logger) = logger.as_mut() {
            logger.log(&result)?;
        }
        stats.record(&result);
    }

    for (seat, e) in table.flush_agents() {
        ui::display_warning(err, &format!("seat {} could not persist its state: {}", seat, e))?;
    }

    let metrics: BTreeMap<usize, _> = table
        .seats()
        .iter()
        .filter_map(|s| match &s.controller {
            Controller::Agent(agent) => agent.metrics().map(|m| (s.id, m)),
            Controller::External => None,
        })
        .collect();

    let summary = stats.summary(seed, &metrics);
    info!(played = summary.games_played, "simulation finished");

    ui::write_rule(out, "Simulation")?;
    writeln!(out, "Seed: {}", seed)?;
    if let Some(path) = &args.log {
        writeln!(out, "Log: {} ({})", path.display(), cfg.log_format)?;
    }
    summary.write_text(out)?;
    let json = serde_json::to_string_pretty(&summary).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::RuleArgs;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn args(games: u64) -> SimArgs {
        SimArgs {
            games: Some(games),
            seed: Some(11),
            agents: Some("A:random,B:heuristic,C:heuristic".into()),
            initial_funds: Some(200),
            funds: None,
            rules: RuleArgs {
                ante: Some(5),
                ..RuleArgs::default()
            },
            log: None,
            log_format: None,
            config: None,
            model: None,
            cache: None,
        }
    }

    #[test]
    fn chips_are_conserved_over_a_run() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let summary = handle_sim_command(&args(25), &mut out, &mut err, &no_env).unwrap();
        assert_eq!(summary.total_games, 25);
        let total: u32 = summary.players.iter().map(|p| p.bankroll).sum();
        assert_eq!(total, 600);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Seed: 11"));
        assert!(text.contains("\"games_played\""));
    }

    #[test]
    fn same_seed_same_summary() {
        let a = handle_sim_command(&args(10), &mut Vec::new(), &mut Vec::new(), &no_env).unwrap();
        let b = handle_sim_command(&args(10), &mut Vec::new(), &mut Vec::new(), &no_env).unwrap();
        let bankrolls = |s: &SimSummary| s.players.iter().map(|p| p.bankroll).collect::<Vec<_>>();
        assert_eq!(bankrolls(&a), bankrolls(&b));
        assert_eq!(a.total_pot, b.total_pot);
    }

    #[test]
    fn funds_must_match_seats() {
        let mut a = args(1);
        a.funds = Some("100,100".into());
        let e = handle_sim_command(&a, &mut Vec::new(), &mut Vec::new(), &no_env).unwrap_err();
        assert!(matches!(e, CliError::InvalidInput(_)));
    }
}
