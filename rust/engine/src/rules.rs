use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::agent::{BetDecision, BettingContext};
use crate::deck::DECK_SIZE;
use crate::errors::GameError;
use crate::hand::HAND_SIZE;

/// Table rules shared by every decision of a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionRules {
    /// Most cards a player may exchange during the draw (0..=5)
    pub max_discards: usize,
    /// Smallest opening bet, also the smallest raise increment
    pub min_bet: u32,
    /// Forced contribution collected from every seat before betting
    pub ante: u32,
    /// Cap on bets plus raises in the betting round
    pub max_raises: u32,
}

impl Default for DecisionRules {
    fn default() -> Self {
        Self {
            max_discards: 5,
            min_bet: 10,
            ante: 0,
            max_raises: 3,
        }
    }
}

impl DecisionRules {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.max_discards > HAND_SIZE {
            return Err(GameError::InvalidRules(format!(
                "max_discards must be between 0 and {HAND_SIZE}, got {}",
                self.max_discards
            )));
        }
        Ok(())
    }

    /// Most seats one deck can serve when every player deals in and then
    /// exchanges `max_discards` cards.
    ///
    /// ```
    /// use fivedraw_engine::rules::DecisionRules;
    ///
    /// assert_eq!(DecisionRules::default().seat_capacity(), 5);
    /// let no_draw = DecisionRules { max_discards: 0, ..DecisionRules::default() };
    /// assert_eq!(no_draw.seat_capacity(), 10);
    /// ```
    pub fn seat_capacity(&self) -> usize {
        DECK_SIZE / (HAND_SIZE + self.max_discards)
    }

    /// Smallest raise increment on top of the amount owed.
    pub fn min_raise(&self) -> u32 {
        self.min_bet
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BettingAction {
    Check,
    Bet,
    Call,
    Raise,
    Fold,
}

impl BettingAction {
    pub fn as_str(self) -> &'static str {
        match self {
            BettingAction::Check => "check",
            BettingAction::Bet => "bet",
            BettingAction::Call => "call",
            BettingAction::Raise => "raise",
            BettingAction::Fold => "fold",
        }
    }
}

impl fmt::Display for BettingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BettingAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "check" => Ok(BettingAction::Check),
            "bet" => Ok(BettingAction::Bet),
            "call" => Ok(BettingAction::Call),
            "raise" => Ok(BettingAction::Raise),
            "fold" => Ok(BettingAction::Fold),
            other => Err(format!("unknown betting action: {other}")),
        }
    }
}

/// The closed set of actions a player may take.
///
/// With nothing owed the player may check, and bet if they have chips and
/// the table has a positive minimum bet. When facing a bet the player may
/// call (if they have chips), raise (if they can cover the call plus a
/// minimum raise and the raise cap is not reached) or fold.
///
/// # Examples
///
/// ```
/// use fivedraw_engine::rules::{available_actions, BettingAction as A, DecisionRules};
///
/// let rules = DecisionRules::default();
/// assert_eq!(available_actions(100, 0, 0, &rules), vec![A::Check, A::Bet]);
/// assert_eq!(available_actions(15, 30, 1, &rules), vec![A::Call, A::Fold]);
/// ```
pub fn available_actions(
    stack: u32,
    to_call: u32,
    raises: u32,
    rules: &DecisionRules,
) -> Vec<BettingAction> {
    let mut actions = Vec::with_capacity(3);
    if to_call == 0 {
        actions.push(BettingAction::Check);
        if stack > 0 && rules.min_bet > 0 {
            actions.push(BettingAction::Bet);
        }
    } else {
        if stack > 0 {
            actions.push(BettingAction::Call);
        }
        if stack > to_call && stack - to_call >= rules.min_bet && raises < rules.max_raises {
            actions.push(BettingAction::Raise);
        }
        actions.push(BettingAction::Fold);
    }
    actions
}

/// Outcome of [`normalize_bet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub decision: BetDecision,
    /// True when the proposed action was illegal and the default replaced it
    pub substituted: bool,
}

/// Forces a proposed decision into the legal set.
///
/// Illegal actions are replaced by [`default_bet`]. Legal actions keep
/// their rationale and have their amount clamped: check and fold move
/// nothing, a call moves `min(to_call, stack)`, a bet moves at least
/// `max(min_bet, 1)` and a raise at least `to_call + max(min_raise, 1)`,
/// never more than the stack.
pub fn normalize_bet(decision: BetDecision, ctx: &BettingContext) -> Normalized {
    if !ctx.allows(decision.action) {
        return Normalized {
            decision: default_bet(ctx),
            substituted: true,
        };
    }
    let amount = match decision.action {
        BettingAction::Check | BettingAction::Fold => 0,
        BettingAction::Call => ctx.to_call.min(ctx.stack),
        BettingAction::Bet => {
            let floor = ctx.stack.min(ctx.min_bet.max(1));
            decision.amount.clamp(floor, ctx.stack)
        }
        BettingAction::Raise => {
            let floor = ctx.stack.min(ctx.to_call.saturating_add(ctx.min_raise.max(1)));
            decision.amount.clamp(floor, ctx.stack)
        }
    };
    Normalized {
        decision: BetDecision { amount, ..decision },
        substituted: false,
    }
}

/// Check if free, otherwise call if affordable, otherwise fold.
pub fn default_bet(ctx: &BettingContext) -> BetDecision {
    let decision = if ctx.allows(BettingAction::Check) {
        BetDecision::check()
    } else if ctx.allows(BettingAction::Call) {
        BetDecision::call(ctx.to_call.min(ctx.stack))
    } else {
        BetDecision::fold()
    };
    decision.with_rationale("Default action")
}

#[cfg(test)]
mod tests {
    use super::*;
    use BettingAction as A;

    fn ctx(stack: u32, to_call: u32, raises: u32) -> BettingContext {
        let rules = DecisionRules::default();
        BettingContext {
            game_id: 1,
            player_id: 0,
            pot: 20,
            to_call,
            current_bet: to_call,
            min_bet: rules.min_bet,
            min_raise: rules.min_raise(),
            stack,
            committed: 0,
            raises,
            available_actions: available_actions(stack, to_call, raises, &rules),
        }
    }

    #[test]
    fn raise_requires_headroom_and_cap() {
        let rules = DecisionRules::default();
        assert_eq!(available_actions(100, 10, 0, &rules), vec![A::Call, A::Raise, A::Fold]);
        assert_eq!(available_actions(15, 10, 0, &rules), vec![A::Call, A::Fold]);
        assert_eq!(available_actions(100, 10, 3, &rules), vec![A::Call, A::Fold]);
    }

    #[test]
    fn zero_min_bet_disables_opening() {
        let rules = DecisionRules {
            min_bet: 0,
            ..DecisionRules::default()
        };
        assert_eq!(available_actions(100, 0, 0, &rules), vec![A::Check]);
    }

    #[test]
    fn illegal_action_becomes_default() {
        let n = normalize_bet(BetDecision::check(), &ctx(100, 10, 0));
        assert!(n.substituted);
        assert_eq!(n.decision.action, A::Call);
        assert_eq!(n.decision.amount, 10);

        let n = normalize_bet(BetDecision::call(10), &ctx(100, 0, 0));
        assert!(n.substituted);
        assert_eq!(n.decision.action, A::Check);
    }

    #[test]
    fn amounts_are_clamped() {
        let n = normalize_bet(BetDecision::bet(1), &ctx(100, 0, 0));
        assert_eq!(n.decision.amount, 10);
        let n = normalize_bet(BetDecision::bet(500), &ctx(100, 0, 0));
        assert_eq!(n.decision.amount, 100);
        let n = normalize_bet(BetDecision::raise(12), &ctx(100, 10, 1));
        assert_eq!(n.decision.amount, 20);
        let n = normalize_bet(BetDecision::call(99), &ctx(100, 10, 1));
        assert_eq!(n.decision.amount, 10);
        let n = normalize_bet(BetDecision::fold().with_rationale("weak"), &ctx(100, 10, 1));
        assert_eq!(n.decision.amount, 0);
        assert_eq!(n.decision.rationale.as_deref(), Some("weak"));
        assert!(!n.substituted);
    }

    #[test]
    fn short_call_is_capped_by_stack() {
        let n = normalize_bet(BetDecision::call(30), &ctx(15, 30, 1));
        assert_eq!(n.decision.amount, 15);
    }

    #[test]
    fn max_discards_above_hand_size_is_rejected() {
        let rules = DecisionRules {
            max_discards: 6,
            ..DecisionRules::default()
        };
        assert!(matches!(rules.validate(), Err(GameError::InvalidRules(_))));
    }
}
