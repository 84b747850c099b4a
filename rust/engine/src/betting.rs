use std::collections::BTreeSet;

use crate::agent::{BetDecision, BettingContext};
use crate::errors::GameError;
use crate::player::{BettingEvent, EventKind, RoundPlayer};
use crate::rules::{available_actions, normalize_bet, BettingAction, DecisionRules, Normalized};

/// Posts the ante for every player, capped at their stack. A player who
/// cannot cover it in full goes all-in on the ante.
pub fn collect_antes(players: &mut [RoundPlayer], ante: u32, pot: &mut u32) -> Result<(), GameError> {
    if ante == 0 {
        return Ok(());
    }
    for p in players.iter_mut() {
        let amount = ante.min(p.stack());
        if amount == 0 {
            continue;
        }
        p.pay(amount)?;
        *pot += amount;
        p.record(EventKind::Ante, amount, Some("Ante".to_string()), *pot);
    }
    Ok(())
}

pub fn contenders(players: &[RoundPlayer]) -> usize {
    players.iter().filter(|p| p.in_contention()).count()
}

/// A decision after normalization, as applied to the table.
#[derive(Debug, Clone)]
pub struct Applied {
    pub decision: BetDecision,
    pub event: BettingEvent,
    pub substituted: bool,
}

/// State of the single betting round of a hand.
///
/// Players are addressed by their index in the hand's seat-ordered player
/// list. The turn cursor sits just after the last actor; the next actor is
/// the first player from the cursor onwards (wrapping) who still needs to
/// act and is neither folded nor all-in.
#[derive(Debug, Clone, Default)]
pub struct BettingRound {
    current_bet: u32,
    raises: u32,
    needing: BTreeSet<usize>,
    cursor: usize,
}

impl BettingRound {
    /// Opens the round after antes. Every active player needs to act once.
    pub fn open(players: &[RoundPlayer]) -> Self {
        let current_bet = players.iter().map(|p| p.current_bet).max().unwrap_or(0);
        let needing = players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_active())
            .map(|(i, _)| i)
            .collect();
        Self {
            current_bet,
            raises: 0,
            needing,
            cursor: 0,
        }
    }

    pub fn current_bet(&self) -> u32 {
        self.current_bet
    }

    pub fn raises(&self) -> u32 {
        self.raises
    }

    pub fn to_call(&self, player: &RoundPlayer) -> u32 {
        self.current_bet.saturating_sub(player.current_bet)
    }

    pub fn next_actor(&self, players: &[RoundPlayer]) -> Option<usize> {
        if contenders(players) <= 1 {
            return None;
        }
        let n = players.len();
        (0..n)
            .map(|k| (self.cursor + k) % n)
            .find(|&i| self.needing.contains(&i) && players[i].is_active())
    }

    pub fn is_complete(&self, players: &[RoundPlayer]) -> bool {
        self.next_actor(players).is_none()
    }

    pub fn context(
        &self,
        game_id: u64,
        idx: usize,
        players: &[RoundPlayer],
        pot: u32,
        rules: &DecisionRules,
    ) -> BettingContext {
        let p = &players[idx];
        let to_call = self.to_call(p);
        BettingContext {
            game_id,
            player_id: p.id(),
            pot,
            to_call,
            current_bet: self.current_bet,
            min_bet: rules.min_bet,
            min_raise: rules.min_raise(),
            stack: p.stack(),
            committed: p.committed,
            raises: self.raises,
            available_actions: available_actions(p.stack(), to_call, self.raises, rules),
        }
    }

    /// Normalizes `proposal` for player `idx` and applies it.
    ///
    /// # Errors
    ///
    /// Acting for a folded player or out of turn is an invariant violation
    /// and leaves the round untouched.
    pub fn act(
        &mut self,
        game_id: u64,
        players: &mut [RoundPlayer],
        idx: usize,
        proposal: BetDecision,
        pot: &mut u32,
        rules: &DecisionRules,
    ) -> Result<Applied, GameError> {
        let player = players.get(idx).ok_or(GameError::UnknownPlayer(idx))?;
        if player.folded {
            return Err(GameError::PlayerAlreadyFolded(player.id()));
        }
        let expected = self.next_actor(players);
        if expected != Some(idx) {
            return Err(GameError::NotPlayersTurn {
                expected: expected.map(|i| players[i].id()),
                actual: player.id(),
            });
        }

        let ctx = self.context(game_id, idx, players, *pot, rules);
        let Normalized {
            decision,
            substituted,
        } = normalize_bet(proposal, &ctx);

        let player = &mut players[idx];
        match decision.action {
            BettingAction::Check => {}
            BettingAction::Fold => player.folded = true,
            BettingAction::Call | BettingAction::Bet | BettingAction::Raise => {
                *pot += player.pay(decision.amount)?;
            }
        }
        player.record(decision.action.into(), decision.amount, decision.rationale.clone(), *pot);
        let event = player.history.last().cloned().ok_or_else(|| {
            GameError::ChipInvariant("betting event was not recorded".to_string())
        })?;
        let contribution = player.current_bet;

        match decision.action {
            BettingAction::Bet | BettingAction::Raise => {
                self.current_bet = self.current_bet.max(contribution);
                self.raises = if decision.action == BettingAction::Bet {
                    1
                } else {
                    self.raises + 1
                };
                self.needing = players
                    .iter()
                    .enumerate()
                    .filter(|&(i, p)| i != idx && p.is_active())
                    .map(|(i, _)| i)
                    .collect();
            }
            _ => {
                self.needing.remove(&idx);
            }
        }
        self.cursor = idx + 1;

        Ok(Applied {
            decision,
            event,
            substituted,
        })
    }
}
