//! Input parsing and validation for CLI arguments and interactive prompts.
//!
//! - Agent specifications (`name:kind[:bet_mode]`, comma separated)
//! - Per-seat funds lists
//! - Betting and discard input typed at the `play` prompt
//!
//! Interactive parsers check legality against the live decision context, so
//! anything they return as [`ParseResult::Action`] is accepted by the engine
//! unchanged.

use std::fmt;
use std::str::FromStr;

use fivedraw_ai::model::BetMode;
use fivedraw_engine::agent::{BetDecision, BettingContext};
use fivedraw_engine::rules::BettingAction;

/// Outcome of parsing one line typed at an interactive prompt.
#[derive(Debug, PartialEq)]
pub enum ParseResult<T> {
    Action(T),
    /// User entered quit command (q or quit)
    Quit,
    /// Invalid input with error message
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Random,
    Heuristic,
    Model,
}

impl AgentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::Random => "random",
            AgentKind::Heuristic => "heuristic",
            AgentKind::Model => "model",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(AgentKind::Random),
            "heuristic" => Ok(AgentKind::Heuristic),
            "model" | "llm" => Ok(AgentKind::Model),
            other => Err(format!(
                "unknown agent type '{}' (expected random, heuristic or model)",
                other
            )),
        }
    }
}

/// One seat requested on the command line or in the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSpec {
    pub name: String,
    pub kind: AgentKind,
    pub bet_mode: BetMode,
}

/// Parses `name:kind[:bet_mode]` entries separated by commas.
///
/// A bare kind gets the name `Player{n}` (1-based). A bet mode is only
/// accepted for `model` agents.
///
/// ```rust
/// use fivedraw_cli::validation::{parse_agent_specs, AgentKind};
///
/// let specs = parse_agent_specs("Alice:random, heuristic").unwrap();
/// assert_eq!(specs[0].name, "Alice");
/// assert_eq!(specs[1].name, "Player2");
/// assert_eq!(specs[1].kind, AgentKind::Heuristic);
/// assert!(parse_agent_specs("Bob:oracle").is_err());
/// ```
pub fn parse_agent_specs(input: &str) -> Result<Vec<AgentSpec>, String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .enumerate()
        .map(|(i, entry)| {
            let parts: Vec<&str> = entry.split(':').map(str::trim).collect();
            let (name, kind, mode) = match parts.as_slice() {
                [kind] => (format!("Player{}", i + 1), *kind, None),
                [name, kind] => (name.to_string(), *kind, None),
                [name, kind, mode] => (name.to_string(), *kind, Some(*mode)),
                _ => return Err(format!("invalid agent spec '{}' (expected name:kind[:bet_mode])", entry)),
            };
            if name.is_empty() {
                return Err(format!("agent spec '{}' has an empty name", entry));
            }
            let kind: AgentKind = kind.parse()?;
            let bet_mode = match mode {
                None => BetMode::default(),
                Some(m) if kind == AgentKind::Model => m.parse()?,
                Some(_) => return Err(format!("bet mode is only valid for model agents ('{}')", entry)),
            };
            Ok(AgentSpec { name, kind, bet_mode })
        })
        .collect()
}

/// Parses a comma-separated list of starting stacks, one per seat.
pub fn parse_funds(input: &str, seats: usize) -> Result<Vec<u32>, String> {
    let funds = input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u32>().map_err(|_| format!("invalid stack '{}'", s)))
        .collect::<Result<Vec<u32>, String>>()?;
    if funds.len() != seats {
        return Err(format!(
            "expected {} stacks, got {}",
            seats,
            funds.len()
        ));
    }
    Ok(funds)
}

/// Parses a betting command typed at the prompt.
///
/// Accepted forms: `check` / `k`, `call` / `c`, `fold` / `f`, `bet N`,
/// `raise N`, `q`. For `bet` and `raise`, `N` is the number of chips moved
/// from the stack in this action.
pub fn parse_bet_input(input: &str, ctx: &BettingContext) -> ParseResult<BetDecision> {
    let input = input.trim().to_lowercase();
    let parts: Vec<&str> = input.split_whitespace().collect();
    let Some(&word) = parts.first() else {
        return ParseResult::Invalid("Empty input".to_string());
    };
    if word == "q" || word == "quit" {
        return ParseResult::Quit;
    }

    let action = match word {
        "check" | "k" => BettingAction::Check,
        "call" | "c" => BettingAction::Call,
        "fold" | "f" => BettingAction::Fold,
        "bet" | "b" => BettingAction::Bet,
        "raise" | "r" => BettingAction::Raise,
        other => {
            return ParseResult::Invalid(format!(
                "Unrecognized action '{}'. Valid actions: {}",
                other,
                describe_actions(ctx)
            ));
        }
    };
    if !ctx.allows(action) {
        return ParseResult::Invalid(format!(
            "{} is not available. Valid actions: {}",
            action,
            describe_actions(ctx)
        ));
    }

    match action {
        BettingAction::Check => ParseResult::Action(BetDecision::check()),
        BettingAction::Fold => ParseResult::Action(BetDecision::fold()),
        BettingAction::Call => ParseResult::Action(BetDecision::call(ctx.to_call.min(ctx.stack))),
        BettingAction::Bet | BettingAction::Raise => {
            let (lo, hi) = amount_range(action, ctx);
            let Some(raw) = parts.get(1) else {
                return ParseResult::Invalid(format!(
                    "{} requires an amount between {} and {} (e.g., '{} {}')",
                    action, lo, hi, action, lo
                ));
            };
            match raw.parse::<u32>() {
                Ok(amount) if (lo..=hi).contains(&amount) => {
                    ParseResult::Action(BetDecision::new(action, amount))
                }
                Ok(_) => ParseResult::Invalid(format!(
                    "{} amount must be between {} and {}",
                    action, lo, hi
                )),
                Err(_) => ParseResult::Invalid(format!("Invalid {} amount", action)),
            }
        }
    }
}

/// Smallest and largest legal chip amounts for a bet or raise.
pub fn amount_range(action: BettingAction, ctx: &BettingContext) -> (u32, u32) {
    let lo = match action {
        BettingAction::Bet => ctx.min_bet.max(1),
        BettingAction::Raise => ctx.to_call + ctx.min_raise.max(1),
        BettingAction::Call => ctx.to_call,
        BettingAction::Check | BettingAction::Fold => 0,
    };
    (lo.min(ctx.stack), ctx.stack)
}

/// Prompt text listing the legal actions with their amounts.
pub fn describe_actions(ctx: &BettingContext) -> String {
    ctx.available_actions
        .iter()
        .map(|&a| match a {
            BettingAction::Call => format!("call ({})", ctx.to_call.min(ctx.stack)),
            BettingAction::Bet | BettingAction::Raise => {
                let (lo, hi) = amount_range(a, ctx);
                format!("{} <{}-{}>", a, lo, hi)
            }
            other => other.to_string(),
        })
        .chain(std::iter::once("q".to_string()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parses discard slots typed at the prompt, e.g. `0 3 4` or `1,2`. An
/// empty line stands pat. Slots come back sorted.
pub fn parse_discard_input(input: &str, hand_size: usize, max_discards: usize) -> ParseResult<Vec<usize>> {
    let input = input.trim().to_lowercase();
    if input == "q" || input == "quit" {
        return ParseResult::Quit;
    }
    let mut slots = Vec::new();
    for token in input.split(|c: char| c == ',' || c.is_whitespace()).filter(|t| !t.is_empty()) {
        match token.parse::<usize>() {
            Ok(slot) if slot < hand_size => {
                if slots.contains(&slot) {
                    return ParseResult::Invalid(format!("Slot {} listed twice", slot));
                }
                slots.push(slot);
            }
            Ok(slot) => {
                return ParseResult::Invalid(format!(
                    "Slot {} is out of range (0-{})",
                    slot,
                    hand_size.saturating_sub(1)
                ));
            }
            Err(_) => return ParseResult::Invalid(format!("Invalid slot '{}'", token)),
        }
    }
    if slots.len() > max_discards {
        return ParseResult::Invalid(format!("At most {} cards may be exchanged", max_discards));
    }
    slots.sort_unstable();
    ParseResult::Action(slots)
}
