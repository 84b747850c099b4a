//! Random baseline agent.

use fivedraw_engine::agent::{
    Agent, AgentError, BetDecision, BettingContext, DecisionContext, DiscardDecision,
};
use fivedraw_engine::cards::Card;
use fivedraw_engine::rules::{BettingAction, DecisionRules};
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, RngCore};

/// Never discards more than this many cards, whatever the rules allow.
pub const RANDOM_DISCARD_CAP: usize = 3;

/// Picks a random number of random slots to exchange and a uniformly random
/// legal betting action, always with the smallest legal amount.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    max_discards: usize,
}

impl RandomAgent {
    pub fn new() -> Self {
        Self {
            max_discards: RANDOM_DISCARD_CAP,
        }
    }

    pub fn with_max_discards(max_discards: usize) -> Self {
        Self { max_discards }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        "RandomAgent"
    }

    fn decide_discard(
        &mut self,
        hand: &[Card],
        rules: &DecisionRules,
        _ctx: &DecisionContext,
        rng: &mut dyn RngCore,
    ) -> Result<DiscardDecision, AgentError> {
        let max_allowed = hand.len().min(rules.max_discards).min(self.max_discards);
        let count = rng.random_range(0..=max_allowed);
        if count == 0 {
            return Ok(DiscardDecision::stand_pat());
        }
        let mut slots: Vec<usize> = (0..hand.len()).collect();
        slots.shuffle(rng);
        let mut discard = slots[..count].to_vec();
        discard.sort_unstable();
        Ok(DiscardDecision::new(discard).with_rationale("Random baseline"))
    }

    fn decide_bet(
        &mut self,
        _hand: &[Card],
        ctx: &BettingContext,
        rng: &mut dyn RngCore,
    ) -> Result<BetDecision, AgentError> {
        let action = *ctx
            .available_actions
            .choose(rng)
            .ok_or_else(|| AgentError::Failed("no legal actions offered".to_string()))?;
        let decision = match action {
            BettingAction::Check => BetDecision::check().with_rationale("Random: check"),
            BettingAction::Fold => BetDecision::fold().with_rationale("Random: fold"),
            BettingAction::Call => {
                BetDecision::call(ctx.to_call.min(ctx.stack)).with_rationale("Random: call")
            }
            BettingAction::Bet => {
                BetDecision::bet(ctx.min_bet.min(ctx.stack)).with_rationale("Random: bet")
            }
            BettingAction::Raise => BetDecision::raise((ctx.to_call + ctx.min_raise).min(ctx.stack))
                .with_rationale("Random: raise"),
        };
        Ok(decision)
    }
}
