//! # Play Command
//!
//! Interactive five-card draw at the terminal. Seat 0 belongs to the
//! operator; every other seat is driven by an agent.
//!
//! Each hand runs its betting round, then the draw, then the showdown. When
//! the operator is to act the legal actions are listed and the line typed
//! is checked before it reaches the engine; anything unusable is reported
//! and asked for again. `q` (or end of input) leaves the table.

use std::io::{BufRead, Write};

use fivedraw_engine::agent::DiscardDecision;
use fivedraw_engine::engine::{Hand, Phase, Table};
use fivedraw_engine::hand::HAND_SIZE;
use fivedraw_engine::logger::GameResult;
use fivedraw_engine::player::{Controller, Seat};

use crate::agents::{build_agent, ModelOptions};
use crate::cli::PlayArgs;
use crate::config::{load_with_sources, Overrides};
use crate::error::CliError;
use crate::formatters::{format_cards_plain, format_evaluation, format_event, format_hand};
use crate::io_utils::read_stdin_line;
use crate::ui;
use crate::validation::{
    describe_actions, parse_agent_specs, parse_bet_input, parse_discard_input, ParseResult,
};

/// Seat id of the operator.
pub const HUMAN: usize = 0;

enum Turn {
    Continue,
    Quit,
}

/// Handle the play command.
///
/// Returns the number of hands completed.
///
/// # Examples
///
/// ```no_run
/// use fivedraw_cli::cli::PlayArgs;
/// use fivedraw_cli::commands::play::handle_play_command;
/// # fn args() -> PlayArgs { unimplemented!() }
/// let env = |k: &str| std::env::var(k).ok();
/// let mut input = std::io::stdin().lock();
/// handle_play_command(&args(), &mut input, &mut std::io::stdout(), &mut std::io::stderr(), &env)
///     .unwrap();
/// ```
pub fn handle_play_command(
    args: &PlayArgs,
    stdin: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
    env: &dyn Fn(&str) -> Option<String>,
) -> Result<u64, CliError> {
    if args.hands == 0 {
        return Err(CliError::InvalidInput("hands must be >= 1".to_string()));
    }
    let overrides = Overrides {
        seed: args.seed,
        initial_funds: args.initial_funds,
        min_bet: args.rules.min_bet,
        ante: args.rules.ante,
        max_raises: args.rules.max_raises,
        max_discards: args.rules.max_discards,
        ..Overrides::default()
    };
    let cfg = load_with_sources(args.config.as_deref(), env, &overrides)?.config;
    let opponents = parse_agent_specs(&args.opponents).map_err(CliError::InvalidInput)?;
    if opponents.is_empty() {
        return Err(CliError::InvalidInput("at least one opponent is required".to_string()));
    }

    let opts = ModelOptions::default();
    let mut seats = vec![Seat::new(HUMAN, "You", Controller::External, cfg.initial_funds)];
    for (i, spec) in opponents.iter().enumerate() {
        let agent = build_agent(spec, &opts)?;
        seats.push(Seat::new(i + 1, spec.name.clone(), Controller::Agent(agent), cfg.initial_funds));
    }

    let seed = cfg.seed.unwrap_or_else(rand::random);
    let rules = cfg.rules();
    let mut table = Table::new(seats, rules, Some(seed))?;
    writeln!(
        out,
        "play: opponents={} hands={} seed={}",
        opponents.len(),
        args.hands,
        seed
    )?;
    writeln!(
        out,
        "Rules: ante={} min_bet={} max_raises={} max_discards={}",
        rules.ante, rules.min_bet, rules.max_raises, rules.max_discards
    )?;

    let mut played = 0u64;
    for game_id in 1..=args.hands {
        if table.seats()[HUMAN].stack == 0 {
            writeln!(out, "You are out of chips.")?;
            break;
        }
        if table.funded_seats() < 2 {
            writeln!(out, "No opponent has chips left.")?;
            break;
        }
        ui::write_rule(out, &format!("Hand {}", game_id))?;
        let mut hand = table.start_hand(game_id)?;
        if let Turn::Quit = play_hand(&mut hand, stdin, out, err)? {
            writeln!(out, "Quit.")?;
            return Ok(played);
        }
        let result = table.finish_hand(hand)?;
        write_result(out, &result)?;
        played += 1;
    }

    writeln!(out, "Session complete: {} hand(s) played", played)?;
    for seat in table.seats() {
        writeln!(out, "  {}: {}", seat.name, seat.stack)?;
    }
    Ok(played)
}

fn play_hand(
    hand: &mut Hand,
    stdin: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<Turn, CliError> {
    if let Ok(me) = hand.player(HUMAN) {
        writeln!(out, "Your hand: {}", format_hand(&me.hand))?;
    }
    loop {
        match hand.phase() {
            Phase::Betting => {
                let Some(actor) = hand.current_actor() else {
                    hand.step()?;
                    continue;
                };
                if actor == HUMAN {
                    if let Turn::Quit = human_bet(hand, stdin, out, err)? {
                        return Ok(Turn::Quit);
                    }
                } else {
                    let name = hand.player(actor)?.name().to_string();
                    let event = hand.auto_bet()?;
                    writeln!(out, "{}: {}", name, format_event(&event))?;
                }
            }
            Phase::Draw => match hand.next_to_discard() {
                Some(HUMAN) => {
                    if let Turn::Quit = human_discard(hand, stdin, out, err)? {
                        return Ok(Turn::Quit);
                    }
                }
                Some(id) => {
                    let name = hand.player(id)?.name().to_string();
                    let decision = hand.auto_discard()?;
                    writeln!(out, "{} draws {}", name, decision.discard_indices.len())?;
                }
                None => {
                    hand.step()?;
                }
            },
            Phase::Showdown => {
                hand.resolve()?;
            }
            Phase::Complete => return Ok(Turn::Continue),
        }
    }
}

fn human_bet(
    hand: &mut Hand,
    stdin: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<Turn, CliError> {
    loop {
        let ctx = hand.betting_context(HUMAN)?;
        writeln!(
            out,
            "Pot: {} | To call: {} | Stack: {}",
            ctx.pot, ctx.to_call, ctx.stack
        )?;
        write!(out, "Enter action [{}]: ", describe_actions(&ctx))?;
        out.flush()?;

        let Some(input) = read_stdin_line(stdin) else {
            return Ok(Turn::Quit);
        };
        match parse_bet_input(&input, &ctx) {
            ParseResult::Action(decision) => {
                let event = hand.submit_bet(HUMAN, decision)?;
                writeln!(out, "You: {}", format_event(&event))?;
                return Ok(Turn::Continue);
            }
            ParseResult::Quit => return Ok(Turn::Quit),
            ParseResult::Invalid(msg) => ui::write_error(err, &msg)?,
        }
    }
}

fn human_discard(
    hand: &mut Hand,
    stdin: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<Turn, CliError> {
    let max_discards = hand.rules().max_discards;
    loop {
        let cards = hand.player(HUMAN)?.hand.clone();
        writeln!(out, "Your hand: {}", format_hand(&cards))?;
        write!(
            out,
            "Discard up to {} slots (e.g. 0 3 4, empty to stand pat, q): ",
            max_discards
        )?;
        out.flush()?;

        let Some(input) = read_stdin_line(stdin) else {
            return Ok(Turn::Quit);
        };
        match parse_discard_input(&input, HAND_SIZE, max_discards) {
            ParseResult::Action(slots) => {
                hand.submit_discard(HUMAN, DiscardDecision::new(slots))?;
                let after = &hand.player(HUMAN)?.hand_after;
                writeln!(out, "New hand: {}", format_hand(after))?;
                return Ok(Turn::Continue);
            }
            ParseResult::Quit => return Ok(Turn::Quit),
            ParseResult::Invalid(msg) => ui::write_error(err, &msg)?,
        }
    }
}

fn write_result(out: &mut dyn Write, result: &GameResult) -> Result<(), CliError> {
    writeln!(out, "Showdown (pot {}):", result.pot)?;
    for p in &result.players {
        let shown = match (&p.final_eval, p.folded) {
            (_, true) => "folded".to_string(),
            (Some(eval), false) => format!("{} {}", format_cards_plain(&p.hand_after), format_evaluation(eval)),
            (None, false) => format_cards_plain(&p.hand_after),
        };
        let marker = if result.winners.contains(&p.player_id) { " *" } else { "" };
        writeln!(out, "  {}: {} ({:+}){}", p.name, shown, p.stack_change, marker)?;
    }
    Ok(())
}
