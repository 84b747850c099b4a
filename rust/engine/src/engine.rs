use std::collections::BTreeMap;
use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::agent::{AgentError, BetDecision, BettingContext, DecisionContext, DiscardDecision};
use crate::betting::{collect_antes, contenders, BettingRound};
use crate::deck::{Deck, DECK_SIZE};
use crate::draw::{apply_discard, resolve_discard};
use crate::errors::GameError;
use crate::hand::{evaluate, HAND_SIZE};
use crate::logger::{GameResult, HandEvent, PlayerResult, SeatSnapshot};
use crate::player::{BettingEvent, Controller, RoundPlayer, Seat};
use crate::rules::{default_bet, DecisionRules};
use crate::showdown::settle;

/// Most seats one 52-card deck can deal five cards to.
pub const MAX_SEATS: usize = DECK_SIZE / HAND_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Betting,
    Draw,
    Showdown,
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Betting => "betting",
            Phase::Draw => "draw",
            Phase::Showdown => "showdown",
            Phase::Complete => "complete",
        };
        f.write_str(s)
    }
}

/// One hand of five-card draw, driven either step by step or to completion
/// with [`Hand::auto_play`].
///
/// The hand owns the seats dealt in, the deck and its random generator.
/// Seats are handed back by [`Hand::into_seats`] once the hand is complete.
///
/// # Examples
///
/// ```
/// use fivedraw_engine::engine::{Hand, Phase};
/// use fivedraw_engine::player::{Controller, Seat};
/// use fivedraw_engine::rules::DecisionRules;
///
/// let seats = vec![
///     Seat::new(0, "Alice", Controller::External, 100),
///     Seat::new(1, "Bob", Controller::External, 100),
/// ];
/// let mut hand = Hand::start(1, seats, DecisionRules::default(), 42).unwrap();
/// assert_eq!(hand.phase(), Phase::Betting);
/// assert_eq!(hand.current_actor(), Some(0));
///
/// let result = hand.auto_play().unwrap();
/// assert_eq!(result.net_stack_change(), 0);
/// ```
pub struct Hand {
    game_id: u64,
    rules: DecisionRules,
    rng: ChaCha20Rng,
    deck: Deck,
    players: Vec<RoundPlayer>,
    // seats without chips, not dealt in
    idle: Vec<Seat>,
    pot: u32,
    phase: Phase,
    betting: BettingRound,
    draw_queue: Vec<usize>,
    draw_cursor: usize,
    events: Vec<HandEvent>,
    result: Option<GameResult>,
}

impl fmt::Debug for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hand")
            .field("game_id", &self.game_id)
            .field("phase", &self.phase)
            .field("pot", &self.pot)
            .field("players", &self.players.len())
            .finish()
    }
}

impl Hand {
    /// Shuffles a fresh deck with a generator seeded from `seed` and deals.
    pub fn start(
        game_id: u64,
        seats: Vec<Seat>,
        rules: DecisionRules,
        seed: u64,
    ) -> Result<Self, GameError> {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let deck = Deck::new_shuffled(&mut rng);
        Self::deal(game_id, seats, rules, deck, rng)
    }

    /// Deals from a prepared deck. Agents still draw randomness from `seed`.
    pub fn with_deck(
        game_id: u64,
        seats: Vec<Seat>,
        rules: DecisionRules,
        deck: Deck,
        seed: u64,
    ) -> Result<Self, GameError> {
        Self::deal(game_id, seats, rules, deck, ChaCha20Rng::seed_from_u64(seed))
    }

    fn deal(
        game_id: u64,
        mut seats: Vec<Seat>,
        rules: DecisionRules,
        mut deck: Deck,
        rng: ChaCha20Rng,
    ) -> Result<Self, GameError> {
        rules.validate()?;
        seats.sort_by_key(|s| s.id);
        let (funded, idle): (Vec<Seat>, Vec<Seat>) = seats.into_iter().partition(|s| s.stack > 0);
        if funded.len() < 2 {
            return Err(GameError::NotEnoughFundedSeats);
        }
        check_capacity(&funded, &rules)?;

        let hands = deck.deal(funded.len(), HAND_SIZE)?;
        let mut players = Vec::with_capacity(funded.len());
        for (seat, cards) in funded.into_iter().zip(hands) {
            let eval = evaluate(&cards)?;
            players.push(RoundPlayer::new(seat, cards, eval));
        }

        let mut pot = 0;
        collect_antes(&mut players, rules.ante, &mut pot)?;
        let betting = BettingRound::open(&players);

        let events = vec![HandEvent::HandStart {
            game_id,
            pot,
            players: players
                .iter()
                .map(|p| SeatSnapshot {
                    player_id: p.id(),
                    name: p.name().to_string(),
                    stack: p.stack(),
                    hand: p.hand.clone(),
                })
                .collect(),
        }];
        debug!(game_id, players = players.len(), pot, "hand dealt");

        let mut hand = Self {
            game_id,
            rules,
            rng,
            deck,
            players,
            idle,
            pot,
            phase: Phase::Betting,
            betting,
            draw_queue: Vec::new(),
            draw_cursor: 0,
            events,
            result: None,
        };
        hand.advance();
        Ok(hand)
    }

    pub fn game_id(&self) -> u64 {
        self.game_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pot(&self) -> u32 {
        self.pot
    }

    pub fn rules(&self) -> &DecisionRules {
        &self.rules
    }

    pub fn current_bet(&self) -> u32 {
        self.betting.current_bet()
    }

    pub fn players(&self) -> &[RoundPlayer] {
        &self.players
    }

    pub fn player(&self, player_id: usize) -> Result<&RoundPlayer, GameError> {
        self.index_of(player_id).map(|i| &self.players[i])
    }

    pub fn events(&self) -> &[HandEvent] {
        &self.events
    }

    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }

    fn index_of(&self, player_id: usize) -> Result<usize, GameError> {
        self.players
            .iter()
            .position(|p| p.id() == player_id)
            .ok_or(GameError::UnknownPlayer(player_id))
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), GameError> {
        match self.phase {
            Phase::Complete if expected != Phase::Complete => Err(GameError::HandAlreadyComplete),
            actual if actual != expected => Err(GameError::WrongPhase { expected, actual }),
            _ => Ok(()),
        }
    }

    /// Moves to the next phase when the current one is finished.
    fn advance(&mut self) {
        loop {
            let next = match self.phase {
                Phase::Betting if self.betting.is_complete(&self.players) => {
                    if contenders(&self.players) > 1 {
                        self.draw_queue = self
                            .players
                            .iter()
                            .enumerate()
                            .filter(|(_, p)| p.in_contention())
                            .map(|(i, _)| i)
                            .collect();
                        self.draw_cursor = 0;
                        Phase::Draw
                    } else {
                        Phase::Showdown
                    }
                }
                Phase::Draw if self.draw_cursor >= self.draw_queue.len() => Phase::Showdown,
                _ => return,
            };
            debug!(game_id = self.game_id, from = %self.phase, to = %next, "phase change");
            self.phase = next;
        }
    }

    /// Player id whose betting decision is awaited, if any.
    pub fn current_actor(&self) -> Option<usize> {
        if self.phase != Phase::Betting {
            return None;
        }
        self.betting
            .next_actor(&self.players)
            .map(|i| self.players[i].id())
    }

    /// Fresh decision context for `player_id`, who must be the current actor.
    pub fn betting_context(&self, player_id: usize) -> Result<BettingContext, GameError> {
        self.expect_phase(Phase::Betting)?;
        let idx = self.index_of(player_id)?;
        let expected = self.current_actor();
        if expected != Some(player_id) {
            return Err(GameError::NotPlayersTurn {
                expected,
                actual: player_id,
            });
        }
        Ok(self
            .betting
            .context(self.game_id, idx, &self.players, self.pot, &self.rules))
    }

    /// Applies a betting decision for `player_id`. Illegal actions are
    /// replaced with the default and amounts are clamped; acting out of turn
    /// is an error.
    pub fn submit_bet(&mut self, player_id: usize, decision: BetDecision) -> Result<BettingEvent, GameError> {
        self.expect_phase(Phase::Betting)?;
        let idx = self.index_of(player_id)?;
        self.apply_bet(idx, decision, false)
    }

    /// Asks the current actor's agent for a decision and applies it.
    pub fn auto_bet(&mut self) -> Result<BettingEvent, GameError> {
        self.expect_phase(Phase::Betting)?;
        let idx = self
            .betting
            .next_actor(&self.players)
            .ok_or_else(|| GameError::ChipInvariant("betting phase without an actor".to_string()))?;
        let ctx = self
            .betting
            .context(self.game_id, idx, &self.players, self.pot, &self.rules);
        let player = &mut self.players[idx];
        let proposal = match &mut player.seat.controller {
            Controller::Agent(agent) => agent.decide_bet(&player.hand, &ctx, &mut self.rng),
            Controller::External => Err(AgentError::Unsupported("external seat")),
        };
        let (decision, failed) = match proposal {
            Ok(decision) => (decision, false),
            Err(AgentError::Unsupported(what)) => {
                debug!(game_id = self.game_id, player_id = ctx.player_id, what, "using default bet");
                (default_bet(&ctx), false)
            }
            Err(e) => {
                warn!(game_id = self.game_id, player_id = ctx.player_id, error = %e, "bet decision failed, using default");
                (default_bet(&ctx), true)
            }
        };
        self.apply_bet(idx, decision, failed)
    }

    fn apply_bet(&mut self, idx: usize, decision: BetDecision, failed: bool) -> Result<BettingEvent, GameError> {
        let applied = self.betting.act(
            self.game_id,
            &mut self.players,
            idx,
            decision,
            &mut self.pot,
            &self.rules,
        )?;
        let player = &mut self.players[idx];
        if applied.substituted {
            warn!(
                game_id = self.game_id,
                player_id = player.id(),
                action = %applied.decision.action,
                "illegal bet decision replaced by default"
            );
        }
        if applied.substituted || failed {
            player.fallbacks += 1;
        }
        debug!(
            game_id = self.game_id,
            player_id = player.id(),
            action = %applied.decision.action,
            amount = applied.decision.amount,
            pot = self.pot,
            "bet applied"
        );
        self.events.push(HandEvent::Bet {
            player_id: player.id(),
            action: applied.decision.action,
            amount: applied.decision.amount,
            pot: self.pot,
            stack: player.stack(),
        });
        self.advance();
        Ok(applied.event)
    }

    /// Player id whose discard is awaited, if any.
    pub fn next_to_discard(&self) -> Option<usize> {
        if self.phase != Phase::Draw {
            return None;
        }
        self.draw_queue
            .get(self.draw_cursor)
            .map(|&i| self.players[i].id())
    }

    /// Validates and applies a discard for `player_id`, who must be next in
    /// seat order. Invalid indices are replaced with the conservative
    /// fallback. Returns the decision actually applied.
    pub fn submit_discard(
        &mut self,
        player_id: usize,
        decision: DiscardDecision,
    ) -> Result<DiscardDecision, GameError> {
        self.expect_phase(Phase::Draw)?;
        let idx = self.index_of(player_id)?;
        self.check_discard_turn(idx)?;
        self.apply_draw(idx, Ok(decision))
    }

    /// Asks the next drawing player's agent for a discard and applies it.
    /// External seats keep their cards.
    pub fn auto_discard(&mut self) -> Result<DiscardDecision, GameError> {
        self.expect_phase(Phase::Draw)?;
        let idx = *self
            .draw_queue
            .get(self.draw_cursor)
            .ok_or_else(|| GameError::ChipInvariant("draw phase without a player".to_string()))?;
        let ctx = DecisionContext {
            game_id: self.game_id,
            player_id: self.players[idx].id(),
        };
        let player = &mut self.players[idx];
        let proposal = match &mut player.seat.controller {
            Controller::Agent(agent) => {
                agent.decide_discard(&player.hand, &self.rules, &ctx, &mut self.rng)
            }
            Controller::External => Ok(DiscardDecision::stand_pat()),
        };
        self.apply_draw(idx, proposal)
    }

    fn check_discard_turn(&self, idx: usize) -> Result<(), GameError> {
        let player = &self.players[idx];
        if player.folded {
            return Err(GameError::PlayerAlreadyFolded(player.id()));
        }
        let expected = self.next_to_discard();
        if expected != Some(player.id()) {
            return Err(GameError::NotPlayersTurn {
                expected,
                actual: player.id(),
            });
        }
        Ok(())
    }

    fn apply_draw(
        &mut self,
        idx: usize,
        proposal: Result<DiscardDecision, AgentError>,
    ) -> Result<DiscardDecision, GameError> {
        let player = &mut self.players[idx];
        if let Err(e) = &proposal {
            warn!(game_id = self.game_id, player_id = player.id(), error = %e, "discard decision failed");
        }
        let (decision, substituted) = resolve_discard(&player.hand, &self.rules, proposal);
        if substituted {
            warn!(
                game_id = self.game_id,
                player_id = player.id(),
                discards = ?decision.discard_indices,
                "discard replaced by fallback"
            );
            player.fallbacks += 1;
        }
        player.hand_after = apply_discard(&player.hand, &decision.discard_indices, &mut self.deck)?;
        player.final_eval = Some(evaluate(&player.hand_after)?);
        player.discard = Some(decision.clone());
        debug!(
            game_id = self.game_id,
            player_id = player.id(),
            discards = decision.discard_indices.len(),
            "draw applied"
        );
        self.events.push(HandEvent::Discard {
            player_id: player.id(),
            discard_indices: decision.discard_indices.clone(),
            hand_after: player.hand_after.clone(),
        });
        self.draw_cursor += 1;
        self.advance();
        Ok(decision)
    }

    /// Distributes the pot. Runs exactly once; a second call fails with
    /// [`GameError::HandAlreadyComplete`].
    pub fn resolve(&mut self) -> Result<&GameResult, GameError> {
        self.expect_phase(Phase::Showdown)?;
        let pot = self.pot;
        let settlement = settle(&mut self.players, pot)?;
        self.events.push(HandEvent::Showdown {
            winners: settlement.winners.clone(),
            payouts: settlement.payouts.clone(),
            pot,
        });

        let players: Vec<PlayerResult> = self.players.iter().map(PlayerResult::from_round).collect();
        let net: i64 = players.iter().map(|p| p.stack_change).sum();
        if net != 0 {
            return Err(GameError::ChipInvariant(format!(
                "stack changes sum to {net} instead of 0"
            )));
        }
        let bankrolls = self
            .players
            .iter()
            .map(|p| (p.id(), p.stack()))
            .chain(self.idle.iter().map(|s| (s.id, s.stack)))
            .collect::<BTreeMap<_, _>>();

        info!(game_id = self.game_id, pot, winners = ?settlement.winners, "hand complete");
        self.phase = Phase::Complete;
        Ok(self.result.insert(GameResult {
            game_id: self.game_id,
            pot,
            winners: settlement.winners,
            bankrolls,
            players,
            ts: None,
        }))
    }

    /// Performs the next automatic step: a betting decision, a discard or
    /// the showdown. Returns the phase reached.
    pub fn step(&mut self) -> Result<Phase, GameError> {
        match self.phase {
            Phase::Betting => {
                self.auto_bet()?;
            }
            Phase::Draw => {
                self.auto_discard()?;
            }
            Phase::Showdown => {
                self.resolve()?;
            }
            Phase::Complete => return Err(GameError::HandAlreadyComplete),
        }
        Ok(self.phase)
    }

    /// Steps until the hand is complete.
    pub fn auto_play(&mut self) -> Result<GameResult, GameError> {
        while self.phase != Phase::Complete {
            self.step()?;
        }
        self.result
            .clone()
            .ok_or_else(|| GameError::ChipInvariant("completed hand without a result".to_string()))
    }

    /// Returns the seats, in id order, with their updated stacks.
    pub fn into_seats(self) -> Result<Vec<Seat>, GameError> {
        if self.phase != Phase::Complete {
            return Err(GameError::HandInProgress);
        }
        let mut seats: Vec<Seat> = self
            .players
            .into_iter()
            .map(|p| p.seat)
            .chain(self.idle)
            .collect();
        seats.sort_by_key(|s| s.id);
        Ok(seats)
    }
}

/// A set of persistent seats playing hand after hand.
///
/// Every hand gets its own seed drawn from the table's generator, so a
/// table seeded once replays the same sequence of hands.
pub struct Table {
    seats: Vec<Seat>,
    rules: DecisionRules,
    rng: ChaCha20Rng,
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("seats", &self.seats)
            .field("rules", &self.rules)
            .finish()
    }
}

impl Table {
    /// Seat ids are reassigned to their position in `seats`.
    pub fn new(mut seats: Vec<Seat>, rules: DecisionRules, seed: Option<u64>) -> Result<Self, GameError> {
        if seats.len() < 2 {
            return Err(GameError::TooFewSeats(seats.len()));
        }
        rules.validate()?;
        check_capacity(&seats, &rules)?;
        for (i, seat) in seats.iter_mut().enumerate() {
            seat.id = i;
        }
        let rng = match seed {
            Some(s) => ChaCha20Rng::seed_from_u64(s),
            None => ChaCha20Rng::seed_from_u64(rand::rng().random()),
        };
        Ok(Self { seats, rules, rng })
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn rules(&self) -> &DecisionRules {
        &self.rules
    }

    pub fn bankrolls(&self) -> BTreeMap<usize, u32> {
        self.seats.iter().map(|s| (s.id, s.stack)).collect()
    }

    pub fn funded_seats(&self) -> usize {
        self.seats.iter().filter(|s| s.stack > 0).count()
    }

    /// Moves the seats into a new hand. They come back through
    /// [`Table::finish_hand`].
    pub fn start_hand(&mut self, game_id: u64) -> Result<Hand, GameError> {
        if self.funded_seats() < 2 {
            return Err(GameError::NotEnoughFundedSeats);
        }
        let seed = self.rng.random::<u64>();
        let seats = std::mem::take(&mut self.seats);
        Hand::start(game_id, seats, self.rules, seed)
    }

    pub fn finish_hand(&mut self, hand: Hand) -> Result<GameResult, GameError> {
        let result = hand
            .result()
            .cloned()
            .ok_or(GameError::HandInProgress)?;
        self.seats = hand.into_seats()?;
        Ok(result)
    }

    /// Plays one hand to completion. With fewer than two funded seats no
    /// cards are dealt and an idle result is returned.
    pub fn play_hand(&mut self, game_id: u64) -> Result<GameResult, GameError> {
        if self.funded_seats() < 2 {
            debug!(game_id, "not enough funded seats, hand skipped");
            return Ok(GameResult::idle(game_id, self.bankrolls()));
        }
        let mut hand = self.start_hand(game_id)?;
        hand.auto_play()?;
        self.finish_hand(hand)
    }

    /// Flushes every agent, returning the failures by seat id.
    pub fn flush_agents(&mut self) -> Vec<(usize, AgentError)> {
        let mut failures = Vec::new();
        for seat in &mut self.seats {
            if let Controller::Agent(agent) = &mut seat.controller {
                if let Err(e) = agent.flush() {
                    warn!(seat = seat.id, error = %e, "agent flush failed");
                    failures.push((seat.id, e));
                }
            }
        }
        failures
    }
}

/// Rejects seat sets a single deck cannot serve through the draw, and chip
/// totals that would not fit the pot. Stacks and the pot never exceed the
/// table's total, so passing this keeps every chip sum in range.
fn check_capacity(seats: &[Seat], rules: &DecisionRules) -> Result<(), GameError> {
    let max = rules.seat_capacity();
    if seats.len() > max {
        return Err(GameError::TooManySeats {
            max,
            actual: seats.len(),
        });
    }
    let total: u64 = seats.iter().map(|s| u64::from(s.stack)).sum();
    if total > u64::from(u32::MAX) {
        return Err(GameError::TooManyChips(total));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;
    use crate::rules::BettingAction;

    fn external(id: usize, stack: u32) -> Seat {
        Seat::new(id, format!("P{id}"), Controller::External, stack)
    }

    #[test]
    fn resolve_twice_is_an_error() {
        let seats = vec![external(0, 100), external(1, 100)];
        let mut hand = Hand::start(1, seats, DecisionRules::default(), 3).unwrap();
        hand.auto_play().unwrap();
        assert_eq!(hand.resolve().unwrap_err(), GameError::HandAlreadyComplete);
        assert_eq!(hand.step().unwrap_err(), GameError::HandAlreadyComplete);
    }

    #[test]
    fn wrong_phase_is_reported() {
        let seats = vec![external(0, 100), external(1, 100)];
        let mut hand = Hand::start(1, seats, DecisionRules::default(), 3).unwrap();
        let err = hand.submit_discard(0, DiscardDecision::stand_pat()).unwrap_err();
        assert_eq!(
            err,
            GameError::WrongPhase {
                expected: Phase::Draw,
                actual: Phase::Betting
            }
        );
    }

    #[test]
    fn seats_come_back_only_after_completion() {
        let seats = vec![external(0, 100), external(1, 100)];
        let hand = Hand::start(1, seats, DecisionRules::default(), 3).unwrap();
        assert_eq!(hand.into_seats().unwrap_err(), GameError::HandInProgress);
    }

    #[test]
    fn broke_seats_sit_out_and_are_returned() {
        let seats = vec![external(0, 100), external(1, 0), external(2, 100)];
        let mut hand = Hand::start(1, seats, DecisionRules::default(), 9).unwrap();
        assert_eq!(hand.players().len(), 2);
        let result = hand.auto_play().unwrap();
        assert_eq!(result.bankrolls.get(&1), Some(&0));
        let seats = hand.into_seats().unwrap();
        let ids: Vec<usize> = seats.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn everyone_all_in_from_ante_skips_straight_to_draw() {
        let rules = DecisionRules {
            ante: 10,
            ..DecisionRules::default()
        };
        let seats = vec![external(0, 10), external(1, 10)];
        let deck = crate::deck::Deck::from_cards(
            parse_cards("AS AD 2C 3H 4S KS KD 7C 8H 9S 5C 6C").unwrap(),
        );
        let hand = Hand::with_deck(1, seats, rules, deck, 0).unwrap();
        assert_eq!(hand.phase(), Phase::Draw);
        assert_eq!(hand.pot(), 20);
        assert_eq!(hand.next_to_discard(), Some(0));
    }

    #[test]
    fn chip_totals_beyond_the_pot_range_are_rejected() {
        let seats = vec![external(0, 3_000_000_000), external(1, 3_000_000_000)];
        assert_eq!(
            Hand::start(1, seats, DecisionRules::default(), 1).unwrap_err(),
            GameError::TooManyChips(6_000_000_000)
        );
        let seats = vec![external(0, 3_000_000_000), external(1, 3_000_000_000)];
        assert!(matches!(
            Table::new(seats, DecisionRules::default(), Some(1)),
            Err(GameError::TooManyChips(_))
        ));

        // the largest accepted table plays out without overflow
        let seats = vec![external(0, u32::MAX / 2), external(1, u32::MAX - u32::MAX / 2)];
        let mut hand = Hand::start(2, seats, DecisionRules::default(), 1).unwrap();
        hand.submit_bet(0, BetDecision::new(BettingAction::Bet, u32::MAX / 2)).unwrap();
        hand.submit_bet(1, BetDecision::new(BettingAction::Call, u32::MAX / 2)).unwrap();
        let result = hand.auto_play().unwrap();
        assert_eq!(result.net_stack_change(), 0);
        assert_eq!(result.bankrolls.values().map(|&v| u64::from(v)).sum::<u64>(), u64::from(u32::MAX));
    }

    #[test]
    fn seat_count_is_limited_by_draw_demand() {
        let seats = |n: usize| (0..n).map(|i| external(i, 100)).collect::<Vec<_>>();
        assert_eq!(
            Table::new(seats(6), DecisionRules::default(), Some(1)).unwrap_err(),
            GameError::TooManySeats { max: 5, actual: 6 }
        );
        let stand_pat_only = DecisionRules {
            max_discards: 0,
            ..DecisionRules::default()
        };
        let mut table = Table::new(seats(MAX_SEATS), stand_pat_only, Some(1)).unwrap();
        table.play_hand(1).unwrap();
        assert_eq!(table.seats().len(), MAX_SEATS);
        assert!(Hand::start(1, seats(6), DecisionRules::default(), 1).is_err());
    }

    #[test]
    fn table_requires_two_seats() {
        let err = Table::new(vec![external(0, 100)], DecisionRules::default(), Some(1)).unwrap_err();
        assert_eq!(err, GameError::TooFewSeats(1));
    }
}
