use std::collections::HashSet;

use crate::agent::{AgentError, DiscardDecision};
use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::rules::DecisionRules;

/// Most cards the conservative fallback will ever exchange.
pub const FALLBACK_DISCARD_CAP: usize = 3;

pub const FALLBACK_RATIONALE: &str = "Fallback: keep made pairs";

/// Indices must be in range, unique and no more than the rules allow.
pub fn validate_discard(indices: &[usize], hand_size: usize, rules: &DecisionRules) -> bool {
    if indices.len() > rules.max_discards {
        return false;
    }
    let mut seen = HashSet::with_capacity(indices.len());
    indices.iter().all(|&i| i < hand_size && seen.insert(i))
}

/// Deterministic replacement for a missing or invalid discard decision.
///
/// Cards belonging to a pair or better are kept. The rest are ordered by
/// (rank, slot) ascending and the first `min(max_discards, 3)` are thrown.
pub fn fallback_discard(hand: &[Card], rules: &DecisionRules) -> DiscardDecision {
    let max_allowed = rules.max_discards.min(FALLBACK_DISCARD_CAP);
    let mut counts = [0u8; 15];
    for c in hand {
        counts[c.rank.value() as usize] += 1;
    }
    let mut loose: Vec<(u8, usize)> = hand
        .iter()
        .enumerate()
        .filter(|(_, c)| counts[c.rank.value() as usize] < 2)
        .map(|(i, c)| (c.rank.value(), i))
        .collect();
    loose.sort_unstable();
    let mut indices: Vec<usize> = loose.into_iter().take(max_allowed).map(|(_, i)| i).collect();
    indices.sort_unstable();
    DiscardDecision::new(indices).with_rationale(FALLBACK_RATIONALE)
}

/// Accepts a proposal if it is valid, otherwise substitutes the fallback.
/// Returns the decision to apply (indices sorted) and whether it was
/// substituted.
pub fn resolve_discard(
    hand: &[Card],
    rules: &DecisionRules,
    proposal: Result<DiscardDecision, AgentError>,
) -> (DiscardDecision, bool) {
    match proposal {
        Ok(mut decision) if validate_discard(&decision.discard_indices, hand.len(), rules) => {
            decision.discard_indices.sort_unstable();
            (decision, false)
        }
        _ => (fallback_discard(hand, rules), true),
    }
}

/// Replaces the discarded slots with cards from the pile, in ascending slot
/// order. Kept cards stay where they were.
pub fn apply_discard(hand: &[Card], indices: &[usize], deck: &mut Deck) -> Result<Vec<Card>, GameError> {
    let mut slots: Vec<usize> = indices.to_vec();
    slots.sort_unstable();
    let drawn = deck.draw(slots.len())?;
    let mut out = hand.to_vec();
    for (slot, card) in slots.into_iter().zip(drawn) {
        match out.get_mut(slot) {
            Some(target) => *target = card,
            None => return Err(GameError::InvalidHandSize(slot + 1)),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    #[test]
    fn validation_rules() {
        let rules = DecisionRules {
            max_discards: 3,
            ..DecisionRules::default()
        };
        assert!(validate_discard(&[], 5, &rules));
        assert!(validate_discard(&[4, 0, 2], 5, &rules));
        assert!(!validate_discard(&[0, 1, 2, 3], 5, &rules));
        assert!(!validate_discard(&[1, 1], 5, &rules));
        assert!(!validate_discard(&[5], 5, &rules));
    }

    #[test]
    fn fallback_keeps_pairs_and_throws_lowest() {
        let hand = parse_cards("KH 3C KD 9S 2H").unwrap();
        let decision = fallback_discard(&hand, &DecisionRules::default());
        assert_eq!(decision.discard_indices, vec![1, 3, 4]);
        assert_eq!(decision.rationale.as_deref(), Some(FALLBACK_RATIONALE));
    }

    #[test]
    fn fallback_respects_max_discards_and_slot_ties() {
        let hand = parse_cards("7C 7D 8H 8S 4C").unwrap();
        let one = DecisionRules {
            max_discards: 1,
            ..DecisionRules::default()
        };
        assert_eq!(fallback_discard(&hand, &one).discard_indices, vec![4]);
        let none = DecisionRules {
            max_discards: 0,
            ..DecisionRules::default()
        };
        assert!(fallback_discard(&hand, &none).discard_indices.is_empty());
    }

    #[test]
    fn invalid_or_failed_proposals_fall_back() {
        let hand = parse_cards("AS KD 7C 5H 2D").unwrap();
        let rules = DecisionRules::default();
        let (d, substituted) = resolve_discard(&hand, &rules, Ok(DiscardDecision::new(vec![9])));
        assert!(substituted);
        assert_eq!(d.discard_indices, vec![2, 3, 4]);
        let (_, substituted) = resolve_discard(&hand, &rules, Err(AgentError::Failed("timeout".into())));
        assert!(substituted);
        let (d, substituted) = resolve_discard(&hand, &rules, Ok(DiscardDecision::new(vec![4, 1])));
        assert!(!substituted);
        assert_eq!(d.discard_indices, vec![1, 4]);
    }

    #[test]
    fn discarded_slots_are_refilled_in_place() {
        let hand = parse_cards("AS KD 7C 5H 2D").unwrap();
        let mut deck = Deck::from_cards(parse_cards("QC JC").unwrap());
        let after = apply_discard(&hand, &[3, 1], &mut deck).unwrap();
        assert_eq!(after, parse_cards("AS QC 7C JC 2D").unwrap());
        assert_eq!(deck.remaining(), 0);
    }

    #[test]
    fn drawing_from_an_empty_pile_fails() {
        let hand = parse_cards("AS KD 7C 5H 2D").unwrap();
        let mut deck = Deck::from_cards(Vec::new());
        assert!(matches!(
            apply_discard(&hand, &[0], &mut deck),
            Err(GameError::DeckExhausted { .. })
        ));
    }
}
