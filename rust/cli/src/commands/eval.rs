//! Hand evaluator command.

use std::cmp::Ordering;
use std::io::Write;

use fivedraw_engine::cards::{parse_cards, Card};
use fivedraw_engine::hand::{compare, evaluate, HandEvaluation};

use crate::error::CliError;
use crate::formatters::{format_cards_plain, format_evaluation};

fn read_hand(label: &str, input: &str) -> Result<(Vec<Card>, HandEvaluation), CliError> {
    let cards = parse_cards(input).map_err(|e| CliError::InvalidInput(format!("{}: {}", label, e)))?;
    if let Some((i, repeated)) = cards.iter().enumerate().find(|&(i, c)| cards[..i].contains(c)) {
        return Err(CliError::InvalidInput(format!(
            "{}: {} appears more than once (position {})",
            label,
            repeated,
            i + 1
        )));
    }
    let eval = evaluate(&cards).map_err(|e| CliError::InvalidInput(format!("{}: {}", label, e)))?;
    Ok((cards, eval))
}

/// Prints the category and tie-break of `cards`; with `against`, also which
/// hand wins. Returns the comparison when there is one.
pub fn handle_eval_command(
    cards: &str,
    against: Option<&str>,
    out: &mut dyn Write,
) -> Result<Option<Ordering>, CliError> {
    let (first, first_eval) = read_hand("--cards", cards)?;
    writeln!(out, "Hand: {}", format_cards_plain(&first))?;
    writeln!(out, "Rank: {}", format_evaluation(&first_eval))?;

    let Some(against) = against else {
        return Ok(None);
    };
    let (second, second_eval) = read_hand("--against", against)?;
    if let Some(shared) = first.iter().find(|c| second.contains(c)) {
        return Err(CliError::InvalidInput(format!(
            "{} appears in both hands",
            shared
        )));
    }
    writeln!(out, "Against: {}", format_cards_plain(&second))?;
    writeln!(out, "Rank: {}", format_evaluation(&second_eval))?;

    let ord = compare(&first_eval, &second_eval);
    let verdict = match ord {
        Ordering::Greater => "first hand wins",
        Ordering::Less => "second hand wins",
        Ordering::Equal => "tie",
    };
    writeln!(out, "Result: {}", verdict)?;
    Ok(Some(ord))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_hand() {
        let mut out = Vec::new();
        let ord = handle_eval_command("AS KS QS JS TS", None, &mut out).unwrap();
        assert!(ord.is_none());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Rank: Straight Flush"));
    }

    #[test]
    fn flush_beats_straight() {
        let mut out = Vec::new();
        let ord = handle_eval_command("2H 9H JH 4H KH", Some("5C 6D 7H 8S 9C"), &mut out).unwrap();
        assert_eq!(ord, Some(Ordering::Greater));
        assert!(String::from_utf8(out).unwrap().contains("first hand wins"));
    }

    #[test]
    fn suits_do_not_break_ties() {
        let ord = handle_eval_command("AH AD 7C 5S 2H", Some("AC AS 7D 5H 2C"), &mut Vec::new()).unwrap();
        assert_eq!(ord, Some(Ordering::Equal));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(handle_eval_command("AS KS", None, &mut Vec::new()).is_err());
        assert!(handle_eval_command("AS KS QS JS XX", None, &mut Vec::new()).is_err());
        assert!(handle_eval_command("AS KS QS JS TS", Some("AS 2D 3C 4H 6S"), &mut Vec::new()).is_err());
    }

    #[test]
    fn repeated_cards_in_one_hand_are_rejected() {
        let err = handle_eval_command("AS AS AS AS AS", None, &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("AS appears more than once"), "{err}");
        let err = handle_eval_command("AS KD 7C 5H 2D", Some("9C 9D 3S 9C 4H"), &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("--against: 9C appears more than once (position 4)"), "{err}");
    }
}
