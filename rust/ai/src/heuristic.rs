//! Rule-based agent.
//!
//! Discards by made-hand category and bets by hand strength against the
//! price of continuing. Randomness only decides between close options, so
//! the agent is predictable enough to serve as a benchmark opponent.

use fivedraw_engine::agent::{
    Agent, AgentError, BetDecision, BettingContext, DecisionContext, DiscardDecision,
};
use fivedraw_engine::cards::Card;
use fivedraw_engine::hand::{evaluate, Category, HandEvaluation};
use fivedraw_engine::rules::{BettingAction, DecisionRules};
use rand::{Rng, RngCore};

#[derive(Debug, Clone, Default)]
pub struct HeuristicAgent;

impl HeuristicAgent {
    pub fn new() -> Self {
        Self
    }
}

impl Agent for HeuristicAgent {
    fn name(&self) -> &str {
        "HeuristicAgent"
    }

    fn decide_discard(
        &mut self,
        hand: &[Card],
        rules: &DecisionRules,
        _ctx: &DecisionContext,
        _rng: &mut dyn RngCore,
    ) -> Result<DiscardDecision, AgentError> {
        heuristic_discard(hand, rules)
    }

    fn decide_bet(
        &mut self,
        hand: &[Card],
        ctx: &BettingContext,
        rng: &mut dyn RngCore,
    ) -> Result<BetDecision, AgentError> {
        heuristic_bet(hand, ctx, rng)
    }
}

fn evaluate_for_agent(hand: &[Card]) -> Result<HandEvaluation, AgentError> {
    evaluate(hand).map_err(|e| AgentError::Failed(e.to_string()))
}

/// Which slots to exchange.
///
/// Straights and better stand pat. Made pairs, two pair and trips keep the
/// grouped cards. With nothing made, four suited cards keep the flush draw;
/// otherwise the two highest cards are kept. The result never exceeds
/// `max_discards`; the lowest cards are thrown first.
pub fn heuristic_discard(hand: &[Card], rules: &DecisionRules) -> Result<DiscardDecision, AgentError> {
    let eval = evaluate_for_agent(hand)?;
    if eval.category >= Category::Straight {
        return Ok(DiscardDecision::stand_pat().with_rationale(format!("Stand pat with {}", eval.name())));
    }

    let mut counts = [0u8; 15];
    for c in hand {
        counts[c.rank.value() as usize] += 1;
    }
    // (rank, slot) for cards outside any group, lowest first
    let mut loose: Vec<(u8, usize)> = hand
        .iter()
        .enumerate()
        .filter(|(_, c)| counts[c.rank.value() as usize] < 2)
        .map(|(i, c)| (c.rank.value(), i))
        .collect();
    loose.sort_unstable();

    let (mut discard, rationale): (Vec<usize>, String) = if eval.category > Category::HighCard {
        (loose.iter().map(|&(_, i)| i).collect(), format!("Keep {}", eval.name()))
    } else if let Some(odd) = flush_draw_outlier(hand) {
        (vec![odd], "Draw to the flush".to_string())
    } else {
        let throw = loose.len().saturating_sub(2);
        (
            loose[..throw].iter().map(|&(_, i)| i).collect(),
            "Keep two highest cards".to_string(),
        )
    };

    if discard.len() > rules.max_discards {
        // discard is built lowest first
        discard.truncate(rules.max_discards);
    }
    discard.sort_unstable();
    Ok(DiscardDecision::new(discard).with_rationale(rationale))
}

// slot of the single off-suit card when four share a suit
fn flush_draw_outlier(hand: &[Card]) -> Option<usize> {
    hand.iter().find_map(|c| {
        let suited: Vec<usize> = hand
            .iter()
            .enumerate()
            .filter(|(_, o)| o.suit != c.suit)
            .map(|(i, _)| i)
            .collect();
        (suited.len() == 1 && hand.len() == 5).then(|| suited[0])
    })
}

fn raise_chance(category: Category) -> f64 {
    match category.value() {
        6.. => 0.9,
        5 => 0.8,
        4 => 0.65,
        3 => 0.45,
        2 => 0.3,
        1 => 0.2,
        _ => 0.1,
    }
}

/// Strength-driven betting.
///
/// With nothing owed, bets with probability 1.0 / 0.9 / 0.75 / 0.5 for
/// straight or better / two pair or better / one pair / high card, sized at
/// a third, quarter, sixth or eighth of the stack. Facing a bet, continues
/// when the price fits the hand (and sometimes raises), occasionally
/// semi-bluffs, and folds otherwise.
pub fn heuristic_bet(
    hand: &[Card],
    ctx: &BettingContext,
    rng: &mut dyn RngCore,
) -> Result<BetDecision, AgentError> {
    let eval = evaluate_for_agent(hand)?;
    let strength = eval.category.value();
    let name = eval.name();

    if ctx.to_call == 0 && ctx.allows(BettingAction::Check) {
        let can_bet = ctx.allows(BettingAction::Bet) && ctx.stack >= ctx.min_bet;
        let (chance, divisor) = match strength {
            4.. => (1.0, 3),
            2..=3 => (0.9, 4),
            1 => (0.75, 6),
            _ => (0.5, 8),
        };
        if can_bet && rng.random::<f64>() < chance {
            let amount = (ctx.stack / divisor).max(ctx.min_bet).min(ctx.stack);
            return Ok(BetDecision::bet(amount).with_rationale(format!("Heuristic: bet with {name}")));
        }
        return Ok(BetDecision::check().with_rationale("Heuristic: check"));
    }

    let call_amount = ctx.to_call.min(ctx.stack);
    let can_raise = ctx.allows(BettingAction::Raise) && ctx.stack > call_amount + ctx.min_raise;
    let raise_to = (call_amount + ctx.min_raise.max(ctx.min_bet)).min(ctx.stack);

    if ctx.allows(BettingAction::Call) && call_amount > 0 {
        let comfortable = ctx.min_bet.max(ctx.stack / 4);
        let speculative = ctx.min_bet.max(ctx.stack / 6);
        let continues = strength >= 4
            || (strength >= 1 && call_amount <= comfortable)
            || (strength == 0 && call_amount <= speculative && rng.random::<f64>() < 0.6)
            || (call_amount <= ctx.min_bet && rng.random::<f64>() < 0.5);
        if continues {
            if can_raise && rng.random::<f64>() < raise_chance(eval.category) {
                return Ok(BetDecision::raise(raise_to).with_rationale(format!("Heuristic: raise with {name}")));
            }
            return Ok(BetDecision::call(call_amount).with_rationale(format!("Heuristic: call with {name}")));
        }
        if can_raise && rng.random::<f64>() < 0.25 {
            return Ok(BetDecision::raise(raise_to)
                .with_rationale(format!("Heuristic: semi-bluff raise with {name}")));
        }
    }

    if ctx.allows(BettingAction::Fold) {
        return Ok(BetDecision::fold().with_rationale("Heuristic: fold weak hand"));
    }
    if ctx.allows(BettingAction::Call) {
        return Ok(BetDecision::call(call_amount).with_rationale("Heuristic: forced call"));
    }
    Ok(BetDecision::check().with_rationale("Heuristic: forced check"))
}
