use std::fmt;

use serde::{Deserialize, Serialize};

use crate::agent::{Agent, DiscardDecision};
use crate::cards::Card;
use crate::errors::GameError;
use crate::hand::HandEvaluation;
use crate::rules::BettingAction;

/// Who makes decisions for a seat.
pub enum Controller {
    Agent(Box<dyn Agent>),
    /// Driven from outside the engine, one step at a time
    External,
}

impl Controller {
    pub fn agent(agent: impl Agent + 'static) -> Self {
        Controller::Agent(Box::new(agent))
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Controller::External)
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Controller::Agent(agent) => f.debug_tuple("Agent").field(&agent.name()).finish(),
            Controller::External => f.write_str("External"),
        }
    }
}

/// A persistent seat at the table. Its stack carries over between hands.
#[derive(Debug)]
pub struct Seat {
    pub id: usize,
    pub name: String,
    pub controller: Controller,
    pub stack: u32,
}

impl Seat {
    pub fn new(id: usize, name: impl Into<String>, controller: Controller, stack: u32) -> Self {
        Self {
            id,
            name: name.into(),
            controller,
            stack,
        }
    }
}

/// What a ledger entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Ante,
    Check,
    Bet,
    Call,
    Raise,
    Fold,
    Payout,
}

impl From<BettingAction> for EventKind {
    fn from(action: BettingAction) -> Self {
        match action {
            BettingAction::Check => EventKind::Check,
            BettingAction::Bet => EventKind::Bet,
            BettingAction::Call => EventKind::Call,
            BettingAction::Raise => EventKind::Raise,
            BettingAction::Fold => EventKind::Fold,
        }
    }
}

/// One entry in a player's chip ledger for the hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BettingEvent {
    pub action: EventKind,
    pub amount: u32,
    #[serde(default)]
    pub rationale: Option<String>,
    pub pot_after: u32,
    pub stack_after: u32,
}

/// Per-hand state for one participating seat. The seat itself is owned by
/// the round until the hand completes.
#[derive(Debug)]
pub struct RoundPlayer {
    pub seat: Seat,
    pub hand: Vec<Card>,
    pub hand_after: Vec<Card>,
    pub starting_stack: u32,
    /// Chips put in during the current betting round
    pub current_bet: u32,
    /// Chips put in during the whole hand
    pub committed: u32,
    pub folded: bool,
    pub all_in: bool,
    pub history: Vec<BettingEvent>,
    pub discard: Option<DiscardDecision>,
    pub initial_eval: HandEvaluation,
    pub final_eval: Option<HandEvaluation>,
    /// Decisions the engine had to replace with a default
    pub fallbacks: u32,
}

impl RoundPlayer {
    pub fn new(seat: Seat, hand: Vec<Card>, initial_eval: HandEvaluation) -> Self {
        let starting_stack = seat.stack;
        Self {
            seat,
            hand_after: hand.clone(),
            hand,
            starting_stack,
            current_bet: 0,
            committed: 0,
            folded: false,
            all_in: false,
            history: Vec::new(),
            discard: None,
            initial_eval,
            final_eval: None,
            fallbacks: 0,
        }
    }

    pub fn id(&self) -> usize {
        self.seat.id
    }

    pub fn name(&self) -> &str {
        &self.seat.name
    }

    pub fn stack(&self) -> u32 {
        self.seat.stack
    }

    /// Still able to make decisions: not folded and not all-in.
    pub fn is_active(&self) -> bool {
        !self.folded && !self.all_in
    }

    /// Still eligible to win the pot.
    pub fn in_contention(&self) -> bool {
        !self.folded
    }

    /// Moves `amount` chips from the stack into this round's contribution.
    /// A payment that empties the stack puts the player all-in.
    pub fn pay(&mut self, amount: u32) -> Result<u32, GameError> {
        if amount > self.seat.stack {
            return Err(GameError::ChipInvariant(format!(
                "player {} cannot pay {} from a stack of {}",
                self.id(),
                amount,
                self.seat.stack
            )));
        }
        self.seat.stack -= amount;
        self.current_bet += amount;
        self.committed += amount;
        if self.seat.stack == 0 {
            self.all_in = true;
        }
        Ok(amount)
    }

    pub fn record(&mut self, action: EventKind, amount: u32, rationale: Option<String>, pot_after: u32) {
        self.history.push(BettingEvent {
            action,
            amount,
            rationale,
            pot_after,
            stack_after: self.seat.stack,
        });
    }

    /// Stack delta since the hand started.
    pub fn stack_change(&self) -> i64 {
        i64::from(self.seat.stack) - i64::from(self.starting_stack)
    }
}
