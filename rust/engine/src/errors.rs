use thiserror::Error;

use crate::engine::Phase;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Hand evaluation requires exactly 5 cards, got {0}")]
    InvalidHandSize(usize),
    #[error("Invalid card token: {0:?}")]
    InvalidCard(String),
    #[error("Invalid rules: {0}")]
    InvalidRules(String),
    #[error("At least 2 seats are required, got {0}")]
    TooFewSeats(usize),
    #[error("At most {max} seats fit one deck, got {actual}")]
    TooManySeats { max: usize, actual: usize },
    #[error("Seats hold {0} chips in total, more than a table can count")]
    TooManyChips(u64),
    #[error("Fewer than 2 seats have chips to play")]
    NotEnoughFundedSeats,
    #[error("Deck exhausted: requested {requested} cards, {remaining} remaining")]
    DeckExhausted { requested: usize, remaining: usize },
    #[error("Action not allowed during {actual} (expected {expected})")]
    WrongPhase { expected: Phase, actual: Phase },
    #[error("It's not player {actual}'s turn (expected {expected:?})")]
    NotPlayersTurn { expected: Option<usize>, actual: usize },
    #[error("Player {0} already folded")]
    PlayerAlreadyFolded(usize),
    #[error("Unknown player id: {0}")]
    UnknownPlayer(usize),
    #[error("Hand already complete")]
    HandAlreadyComplete,
    #[error("Hand still in progress")]
    HandInProgress,
    #[error("Chip accounting violated: {0}")]
    ChipInvariant(String),
}
