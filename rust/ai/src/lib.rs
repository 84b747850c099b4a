//! # fivedraw-ai: Agents for Five-card Draw
//!
//! Decision-making collaborators that plug into
//! [`fivedraw_engine::agent::Agent`]. The engine treats every answer as a
//! proposal, so agents here are free to be simple, random or remote.
//!
//! ## Core Components
//!
//! - [`random`] - Uniformly random legal play, the baseline opponent
//! - [`heuristic`] - Rank-driven discards and a strength/pot-odds betting policy
//! - [`model`] - Remote-model-backed agent with caching, retries and fallbacks
//! - [`cache`] - Persistent discard decision cache
//! - [`create_agent`] - Factory for the built-in agent kinds
//!
//! ## Quick Start
//!
//! ```rust
//! use fivedraw_ai::create_agent;
//! use fivedraw_engine::engine::Table;
//! use fivedraw_engine::player::{Controller, Seat};
//! use fivedraw_engine::rules::DecisionRules;
//!
//! let seats = vec![
//!     Seat::new(0, "Rand", Controller::Agent(create_agent("random").unwrap()), 500),
//!     Seat::new(1, "Heur", Controller::Agent(create_agent("heuristic").unwrap()), 500),
//! ];
//! let mut table = Table::new(seats, DecisionRules::default(), Some(42)).unwrap();
//! let result = table.play_hand(1).unwrap();
//! assert_eq!(result.net_stack_change(), 0);
//! ```
//!
//! ## Agent Types
//!
//! - `"random"` - [`random::RandomAgent`]
//! - `"heuristic"` - [`heuristic::HeuristicAgent`]
//!
//! [`model::ModelAgent`] needs a cache location and optionally a client, so
//! it is built directly rather than through the factory.

use fivedraw_engine::agent::Agent;
use thiserror::Error;

pub mod cache;
pub mod heuristic;
pub mod model;
pub mod random;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown agent type: {0} (expected random or heuristic)")]
pub struct UnknownAgentType(pub String);

/// Creates one of the built-in agents by type string.
///
/// ```rust
/// use fivedraw_ai::create_agent;
///
/// assert_eq!(create_agent("random").unwrap().name(), "RandomAgent");
/// assert!(create_agent("oracle").is_err());
/// ```
pub fn create_agent(kind: &str) -> Result<Box<dyn Agent>, UnknownAgentType> {
    match kind.trim().to_ascii_lowercase().as_str() {
        "random" => Ok(Box::new(random::RandomAgent::new())),
        "heuristic" => Ok(Box::new(heuristic::HeuristicAgent::new())),
        other => Err(UnknownAgentType(other.to_string())),
    }
}
