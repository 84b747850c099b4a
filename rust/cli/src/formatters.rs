//! Card, hand and ledger formatters for terminal display.
//!
//! Suits render as ♥ ♦ ♣ ♠ where the terminal is known to cope and as
//! h d c s otherwise. Machine-readable output (logs, JSON summaries) never
//! goes through this module; it uses the engine's two-character tokens.
//!
//! ```rust
//! use fivedraw_engine::cards::parse_cards;
//! use fivedraw_cli::formatters::format_hand;
//!
//! let hand = parse_cards("AS KH").unwrap();
//! let shown = format_hand(&hand);
//! assert!(shown == "[0:A♠ 1:K♥]" || shown == "[0:As 1:Kh]");
//! ```

use fivedraw_engine::cards::{Card, Suit};
use fivedraw_engine::hand::HandEvaluation;
use fivedraw_engine::player::{BettingEvent, EventKind};

/// On Windows only modern terminals are trusted with Unicode symbols.
pub fn supports_unicode() -> bool {
    if cfg!(windows) {
        std::env::var("WT_SESSION").is_ok()
            || std::env::var("TERM_PROGRAM").is_ok()
            || std::env::var("VSCODE_INJECTION").is_ok()
    } else {
        true
    }
}

pub fn format_suit(suit: Suit) -> &'static str {
    match (supports_unicode(), suit) {
        (true, Suit::Hearts) => "♥",
        (true, Suit::Diamonds) => "♦",
        (true, Suit::Clubs) => "♣",
        (true, Suit::Spades) => "♠",
        (false, Suit::Hearts) => "h",
        (false, Suit::Diamonds) => "d",
        (false, Suit::Clubs) => "c",
        (false, Suit::Spades) => "s",
    }
}

pub fn format_card(card: &Card) -> String {
    format!("{}{}", card.rank.symbol(), format_suit(card.suit))
}

/// Cards with their slot numbers, as used at the discard prompt.
pub fn format_hand(cards: &[Card]) -> String {
    let shown: Vec<String> = cards
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}:{}", i, format_card(c)))
        .collect();
    format!("[{}]", shown.join(" "))
}

/// Cards without slot numbers.
pub fn format_cards_plain(cards: &[Card]) -> String {
    let shown: Vec<String> = cards.iter().map(format_card).collect();
    format!("[{}]", shown.join(" "))
}

pub fn format_evaluation(eval: &HandEvaluation) -> String {
    let tiebreak: Vec<String> = eval.tiebreak.iter().map(u8::to_string).collect();
    format!("{} ({})", eval.name(), tiebreak.join(" "))
}

/// One ledger entry, e.g. `raise 30 -> pot 70`.
pub fn format_event(event: &BettingEvent) -> String {
    let verb = match event.action {
        EventKind::Ante => "ante",
        EventKind::Check => "check",
        EventKind::Bet => "bet",
        EventKind::Call => "call",
        EventKind::Raise => "raise",
        EventKind::Fold => "fold",
        EventKind::Payout => "wins",
    };
    match event.action {
        EventKind::Check | EventKind::Fold => format!("{} -> pot {}", verb, event.pot_after),
        _ => format!("{} {} -> pot {}", verb, event.amount, event.pot_after),
    }
}
