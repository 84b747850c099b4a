//! Decision contracts between the engine and whoever drives a seat.
//!
//! An [`Agent`] answers two questions: which cards to exchange and how to
//! act in the betting round. Answers are proposals. The engine validates
//! every one of them and substitutes a deterministic default when an answer
//! is missing, fails or breaks the rules, so nothing an agent does can
//! corrupt a hand.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::Card;
use crate::rules::{BettingAction, DecisionRules};

/// Snapshot handed to an agent for one betting decision. Built fresh for
/// every decision.
#[derive(Debug, Serialize)]
pub struct BettingContext {
    pub game_id: u64,
    pub player_id: usize,
    pub pot: u32,
    /// Chips needed to match the current bet
    pub to_call: u32,
    pub current_bet: u32,
    pub min_bet: u32,
    pub min_raise: u32,
    pub stack: u32,
    /// Chips this player has put in during the hand, antes included
    pub committed: u32,
    /// Bets plus raises made so far this round
    pub raises: u32,
    pub available_actions: Vec<BettingAction>,
}

impl BettingContext {
    pub fn allows(&self, action: BettingAction) -> bool {
        self.available_actions.contains(&action)
    }
}

/// Identifies the hand and seat a discard decision is made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecisionContext {
    pub game_id: u64,
    pub player_id: usize,
}

/// A betting proposal. `amount` is the number of chips the action moves
/// from the stack into the pot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetDecision {
    pub action: BettingAction,
    #[serde(default)]
    pub amount: u32,
    #[serde(default)]
    pub rationale: Option<String>,
}

impl BetDecision {
    pub fn new(action: BettingAction, amount: u32) -> Self {
        Self {
            action,
            amount,
            rationale: None,
        }
    }

    pub fn check() -> Self {
        Self::new(BettingAction::Check, 0)
    }

    pub fn fold() -> Self {
        Self::new(BettingAction::Fold, 0)
    }

    pub fn call(amount: u32) -> Self {
        Self::new(BettingAction::Call, amount)
    }

    pub fn bet(amount: u32) -> Self {
        Self::new(BettingAction::Bet, amount)
    }

    pub fn raise(amount: u32) -> Self {
        Self::new(BettingAction::Raise, amount)
    }

    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscardDecision {
    /// Hand slots (0..5) to exchange
    pub discard_indices: Vec<usize>,
    #[serde(default)]
    pub rationale: Option<String>,
}

impl DiscardDecision {
    pub fn new(discard_indices: Vec<usize>) -> Self {
        Self {
            discard_indices,
            rationale: None,
        }
    }

    pub fn stand_pat() -> Self {
        Self::default()
    }

    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("agent does not support {0} decisions")]
    Unsupported(&'static str),
    #[error("agent failed: {0}")]
    Failed(String),
    #[error("agent returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Counters an agent may expose for run summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentMetrics {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub api_calls: u64,
    pub fallbacks: u64,
    pub invalid_responses: u64,
}

/// A decision-making collaborator for one seat.
///
/// Randomness comes from the hand's seeded generator so a whole hand stays
/// reproducible from its seed.
pub trait Agent: Send {
    fn name(&self) -> &str;

    fn decide_discard(
        &mut self,
        hand: &[Card],
        rules: &DecisionRules,
        ctx: &DecisionContext,
        rng: &mut dyn RngCore,
    ) -> Result<DiscardDecision, AgentError>;

    /// Agents without a betting policy get the engine's default action.
    fn decide_bet(
        &mut self,
        hand: &[Card],
        ctx: &BettingContext,
        rng: &mut dyn RngCore,
    ) -> Result<BetDecision, AgentError> {
        let _ = (hand, ctx, rng);
        Err(AgentError::Unsupported("betting"))
    }

    /// Persists any state the agent accumulated, e.g. a decision cache.
    fn flush(&mut self) -> Result<(), AgentError> {
        Ok(())
    }

    fn metrics(&self) -> Option<AgentMetrics> {
        None
    }
}
