use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::{format_cards, Card};
use crate::errors::GameError;

pub const HAND_SIZE: usize = 5;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl Category {
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::OnePair => "One Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Strength of a five-card hand. Ordered by category first, then by the
/// tie-break values compared left to right.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct HandEvaluation {
    pub category: Category,
    // ordered high -> low, shape depends on category
    pub tiebreak: Vec<u8>,
}

impl HandEvaluation {
    pub fn name(&self) -> &'static str {
        self.category.name()
    }
}

impl Ord for HandEvaluation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.category
            .cmp(&other.category)
            .then_with(|| self.tiebreak.cmp(&other.tiebreak))
    }
}

impl PartialOrd for HandEvaluation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Evaluates exactly five cards.
///
/// Cards are grouped by rank and the groups ordered by (size, rank), both
/// descending. The tie-break shape per category:
///
/// | category | tiebreak |
/// |----------|----------|
/// | straight flush, straight | `[high]` (the wheel A-2-3-4-5 has high 5) |
/// | four of a kind | `[quad, kicker]` |
/// | full house | `[trip, pair]` |
/// | flush, high card | all five values, descending |
/// | three of a kind | `[trip, k1, k2]` |
/// | two pair | `[high pair, low pair, kicker]` |
/// | one pair | `[pair, k1, k2, k3]` |
///
/// # Errors
///
/// [`GameError::InvalidHandSize`] if `cards` does not hold exactly five cards.
///
/// # Examples
///
/// ```
/// use fivedraw_engine::cards::parse_cards;
/// use fivedraw_engine::hand::{evaluate, Category};
///
/// let wheel = parse_cards("AS 2D 3C 4H 5S").unwrap();
/// let eval = evaluate(&wheel).unwrap();
/// assert_eq!(eval.category, Category::Straight);
/// assert_eq!(eval.tiebreak, vec![5]);
/// ```
pub fn evaluate(cards: &[Card]) -> Result<HandEvaluation, GameError> {
    if cards.len() != HAND_SIZE {
        return Err(GameError::InvalidHandSize(cards.len()));
    }

    let mut rank_counts = [0u8; 15]; // 2..14 used
    for c in cards {
        rank_counts[c.rank.value() as usize] += 1;
    }
    // (count, rank) pairs, biggest group first, higher rank breaking ties
    let mut groups: Vec<(u8, u8)> = (2..=14u8)
        .rev()
        .filter(|&r| rank_counts[r as usize] > 0)
        .map(|r| (rank_counts[r as usize], r))
        .collect();
    groups.sort_by(|a, b| b.cmp(a));

    let is_flush = cards.iter().all(|c| c.suit == cards[0].suit);
    let straight_high = if groups.len() == HAND_SIZE {
        straight_high(&groups)
    } else {
        None
    };
    let ranks: Vec<u8> = groups.iter().map(|&(_, r)| r).collect();

    let (category, tiebreak) = match (straight_high, is_flush, groups[0].0) {
        (Some(high), true, _) => (Category::StraightFlush, vec![high]),
        (_, _, 4) => (Category::FourOfAKind, ranks),
        (_, _, 3) if groups[1].0 == 2 => (Category::FullHouse, ranks),
        (_, true, _) => (Category::Flush, ranks),
        (Some(high), false, _) => (Category::Straight, vec![high]),
        (_, _, 3) => (Category::ThreeOfAKind, ranks),
        (_, _, 2) if groups[1].0 == 2 => (Category::TwoPair, ranks),
        (_, _, 2) => (Category::OnePair, ranks),
        _ => (Category::HighCard, ranks),
    };
    Ok(HandEvaluation { category, tiebreak })
}

// groups are five singletons sorted by rank descending
fn straight_high(groups: &[(u8, u8)]) -> Option<u8> {
    let high = groups[0].1;
    let low = groups[HAND_SIZE - 1].1;
    if high - low == 4 {
        Some(high)
    } else if high == 14 && groups[1].1 == 5 {
        // A-5-4-3-2
        Some(5)
    } else {
        None
    }
}

pub fn compare(a: &HandEvaluation, b: &HandEvaluation) -> Ordering {
    a.cmp(b)
}

/// Evaluates both hands and compares them.
pub fn compare_hands(a: &[Card], b: &[Card]) -> Result<Ordering, GameError> {
    Ok(compare(&evaluate(a)?, &evaluate(b)?))
}

/// Renders a hand with its category, e.g. `"AS KS QS JS TS (Straight Flush)"`.
pub fn describe(cards: &[Card]) -> Result<String, GameError> {
    let eval = evaluate(cards)?;
    Ok(format!("{} ({})", format_cards(cards), eval.category))
}
