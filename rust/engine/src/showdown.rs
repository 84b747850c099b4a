use std::cmp::Ordering;

use crate::errors::GameError;
use crate::hand::{evaluate, HandEvaluation};
use crate::player::{EventKind, RoundPlayer};

/// Splits `pot` evenly among `winners`. The indivisible remainder goes one
/// chip at a time to the first winners in seat order.
///
/// ```
/// use fivedraw_engine::showdown::split_pot;
///
/// assert_eq!(split_pot(100, 3), vec![34, 33, 33]);
/// assert_eq!(split_pot(10, 2), vec![5, 5]);
/// ```
pub fn split_pot(pot: u32, winners: usize) -> Vec<u32> {
    if winners == 0 {
        return Vec::new();
    }
    let n = winners as u32;
    let share = pot / n;
    let remainder = (pot % n) as usize;
    (0..winners)
        .map(|i| if i < remainder { share + 1 } else { share })
        .collect()
}

/// Indices of the players who win the pot, in seat order.
///
/// A lone contender wins without evaluation. Otherwise every contender's
/// final hand is evaluated and all hands tying the best one win.
pub fn determine_winners(players: &mut [RoundPlayer]) -> Result<Vec<usize>, GameError> {
    let contenders: Vec<usize> = players
        .iter()
        .enumerate()
        .filter(|(_, p)| p.in_contention())
        .map(|(i, _)| i)
        .collect();
    match contenders.as_slice() {
        [] => Err(GameError::ChipInvariant("no player left to award the pot".to_string())),
        [only] => {
            let p = &mut players[*only];
            if p.final_eval.is_none() {
                p.final_eval = Some(p.initial_eval.clone());
            }
            Ok(vec![*only])
        }
        _ => {
            let mut best: Option<HandEvaluation> = None;
            let mut winners = Vec::new();
            for &i in &contenders {
                let eval = match players[i].final_eval.clone() {
                    Some(eval) => eval,
                    None => {
                        let eval = evaluate(&players[i].hand_after)?;
                        players[i].final_eval = Some(eval.clone());
                        eval
                    }
                };
                match best.as_ref().map(|b| eval.cmp(b)) {
                    None | Some(Ordering::Greater) => {
                        best = Some(eval);
                        winners = vec![i];
                    }
                    Some(Ordering::Equal) => winners.push(i),
                    Some(Ordering::Less) => {}
                }
            }
            Ok(winners)
        }
    }
}

/// Result of distributing the pot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    /// Winning player ids in seat order
    pub winners: Vec<usize>,
    /// Chips paid to each winner, parallel to `winners`
    pub payouts: Vec<u32>,
}

/// Determines the winners and pays them. Payouts are credited to the
/// winners' stacks and recorded in their ledgers; they always sum to `pot`.
pub fn settle(players: &mut [RoundPlayer], pot: u32) -> Result<Settlement, GameError> {
    let winner_idx = determine_winners(players)?;
    let payouts = split_pot(pot, winner_idx.len());
    let mut remaining = pot;
    for (&i, &share) in winner_idx.iter().zip(&payouts) {
        remaining -= share;
        let p = &mut players[i];
        p.seat.stack += share;
        p.record(EventKind::Payout, share, Some("Payout".to_string()), remaining);
    }
    if remaining != 0 {
        return Err(GameError::ChipInvariant(format!(
            "{remaining} chips left undistributed"
        )));
    }
    Ok(Settlement {
        winners: winner_idx.iter().map(|&i| players[i].id()).collect(),
        payouts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;
    use crate::player::{Controller, Seat};

    fn player(id: usize, cards: &str) -> RoundPlayer {
        let hand = parse_cards(cards).unwrap();
        let eval = evaluate(&hand).unwrap();
        RoundPlayer::new(Seat::new(id, format!("P{id}"), Controller::External, 0), hand, eval)
    }

    #[test]
    fn remainder_goes_to_earliest_seats() {
        assert_eq!(split_pot(7, 3), vec![3, 2, 2]);
        assert_eq!(split_pot(0, 2), vec![0, 0]);
        assert!(split_pot(50, 0).is_empty());
    }

    #[test]
    fn three_way_tie_splits_one_hundred() {
        let mut players = vec![
            player(0, "2C 3D 4H 5S 6C"),
            player(1, "2D 3H 4S 5C 6D"),
            player(2, "2H 3S 4C 5D 6H"),
        ];
        let s = settle(&mut players, 100).unwrap();
        assert_eq!(s.winners, vec![0, 1, 2]);
        assert_eq!(s.payouts, vec![34, 33, 33]);
        let stacks: Vec<u32> = players.iter().map(|p| p.stack()).collect();
        assert_eq!(stacks, vec![34, 33, 33]);
        assert_eq!(players[2].history.last().unwrap().pot_after, 0);
    }

    #[test]
    fn lone_contender_wins_without_showdown() {
        let mut players = vec![player(0, "2C 3D 4H 5S 7C"), player(1, "AS AD AH KS KC")];
        players[1].folded = true;
        let s = settle(&mut players, 40).unwrap();
        assert_eq!(s.winners, vec![0]);
        assert_eq!(players[0].stack(), 40);
        assert_eq!(players[0].final_eval, Some(players[0].initial_eval.clone()));
    }

    #[test]
    fn best_hand_takes_everything() {
        let mut players = vec![
            player(0, "KC KD 4H 5S 7C"),
            player(1, "AS AD 2H 3S 9C"),
            player(2, "QS QD 2C 3H 9D"),
        ];
        let s = settle(&mut players, 90).unwrap();
        assert_eq!(s.winners, vec![1]);
        assert_eq!(s.payouts, vec![90]);
    }
}
