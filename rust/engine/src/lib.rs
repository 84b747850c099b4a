//! # fivedraw-engine: Five-card Draw Hand Engine
//!
//! Runs hands of five-card draw poker for two to ten seats, as many as one
//! deck can serve through the draw: antes, one betting round, a single
//! draw, and a showdown with split pots. Decisions come from pluggable agents or from outside callers, and
//! every decision is validated before it touches the table.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Rank, Suit, Card) and token parsing
//! - [`deck`] - The shared draw pile, shuffled with ChaCha20
//! - [`hand`] - Five-card evaluation and comparison
//! - [`rules`] - Table rules, legal actions and decision normalization
//! - [`agent`] - Decision contracts between the engine and its agents
//! - [`player`] - Seats, per-hand player state and the chip ledger
//! - [`betting`] - The betting-round state machine
//! - [`draw`] - Discard validation, fallback and replacement
//! - [`showdown`] - Winner determination and pot splitting
//! - [`engine`] - Hand orchestration (`Hand`) and multi-hand play (`Table`)
//! - [`logger`] - Hand results and JSONL/CSV result logging
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use fivedraw_engine::cards::parse_cards;
//! use fivedraw_engine::hand::{compare_hands, evaluate, Category};
//!
//! let flush = parse_cards("2H 9H JH 4H KH").unwrap();
//! let straight = parse_cards("5C 6D 7H 8S 9C").unwrap();
//!
//! assert_eq!(evaluate(&flush).unwrap().category, Category::Flush);
//! assert!(compare_hands(&flush, &straight).unwrap().is_gt());
//! ```
//!
//! ## Deterministic Play
//!
//! A hand is fully determined by its seed and its agents:
//!
//! ```rust
//! use fivedraw_engine::engine::Table;
//! use fivedraw_engine::player::{Controller, Seat};
//! use fivedraw_engine::rules::DecisionRules;
//!
//! let seats = || vec![
//!     Seat::new(0, "A", Controller::External, 200),
//!     Seat::new(1, "B", Controller::External, 200),
//! ];
//! let mut t1 = Table::new(seats(), DecisionRules::default(), Some(7)).unwrap();
//! let mut t2 = Table::new(seats(), DecisionRules::default(), Some(7)).unwrap();
//! assert_eq!(t1.play_hand(1).unwrap(), t2.play_hand(1).unwrap());
//! ```

pub mod agent;
pub mod betting;
pub mod cards;
pub mod deck;
pub mod draw;
pub mod engine;
pub mod errors;
pub mod hand;
pub mod logger;
pub mod player;
pub mod rules;
pub mod showdown;
