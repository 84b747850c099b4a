use std::cmp::Ordering;

use fivedraw_engine::cards::{parse_cards, Card, Rank as R, Suit as S};
use fivedraw_engine::deck::Deck;
use fivedraw_engine::errors::GameError;
use fivedraw_engine::hand::{compare, compare_hands, describe, evaluate, Category};

fn c(r: R, s: S) -> Card {
    Card::new(r, s)
}

fn hand(s: &str) -> Vec<Card> {
    parse_cards(s).expect("valid tokens")
}

#[test]
fn detects_every_category() {
    let cases = [
        ("TH JH QH KH AH", Category::StraightFlush),
        ("9C 9D 9H 9S 2C", Category::FourOfAKind),
        ("3C 3D 3H KS KC", Category::FullHouse),
        ("2H 9H JH 4H KH", Category::Flush),
        ("5C 6D 7H 8S 9C", Category::Straight),
        ("7C 7D 7H AS 2C", Category::ThreeOfAKind),
        ("4C 4D JH JS 9C", Category::TwoPair),
        ("4C 4D JH 2S 9C", Category::OnePair),
        ("2C 5D 9H JS KC", Category::HighCard),
    ];
    for (cards, expected) in cases {
        assert_eq!(evaluate(&hand(cards)).unwrap().category, expected, "{cards}");
    }
}

#[test]
fn wheel_is_five_high_and_loses_to_six_high() {
    let wheel = [
        c(R::Ace, S::Spades),
        c(R::Two, S::Diamonds),
        c(R::Three, S::Clubs),
        c(R::Four, S::Hearts),
        c(R::Five, S::Spades),
    ];
    let eval = evaluate(&wheel).unwrap();
    assert_eq!(eval.category, Category::Straight);
    assert_eq!(eval.tiebreak, vec![5]);
    assert!(compare_hands(&hand("2C 3D 4H 5S 6C"), &wheel).unwrap().is_gt());
}

#[test]
fn category_ordering_is_correct() {
    assert!(compare_hands(&hand("9C 9D 9H 9S 2C"), &hand("AC AD AH KS KC"))
        .unwrap()
        .is_gt());
    assert!(compare_hands(&hand("5C 6D 7H 8S 9C"), &hand("AC AD AH KS QC"))
        .unwrap()
        .is_gt());
    assert!(compare_hands(&hand("2H 3H 4H 5H 7H"), &hand("TC JD QH KS AC"))
        .unwrap()
        .is_gt());
}

#[test]
fn kickers_break_ties_in_order() {
    // same pairs, kicker decides
    assert!(compare_hands(&hand("4C 4D JH JS AC"), &hand("4H 4S JC JD KC"))
        .unwrap()
        .is_gt());
    // higher pair beats better kickers
    assert!(compare_hands(&hand("8C 8D 2H 3S 4C"), &hand("7C 7D AH KS QC"))
        .unwrap()
        .is_gt());
    // flushes compare card by card
    assert!(compare_hands(&hand("AH QH 9H 5H 3H"), &hand("AC QC 9C 5C 2C"))
        .unwrap()
        .is_gt());
}

#[test]
fn suits_never_break_ties() {
    assert_eq!(
        compare_hands(&hand("AS KS 9D 7C 2H"), &hand("AH KH 9C 7D 2S")).unwrap(),
        Ordering::Equal
    );
}

#[test]
fn wrong_size_is_an_error() {
    assert_eq!(
        compare_hands(&hand("AS KS"), &hand("AH KH 9C 7D 2S")),
        Err(GameError::InvalidHandSize(2))
    );
}

#[test]
fn evaluation_ignores_card_order() {
    let mut deck = Deck::new_with_seed(11);
    for _ in 0..10 {
        let cards = deck.draw(5).unwrap();
        let base = evaluate(&cards).unwrap();
        let mut rotated = cards.clone();
        for _ in 0..5 {
            rotated.rotate_left(1);
            assert_eq!(evaluate(&rotated).unwrap(), base);
        }
        let mut reversed = cards.clone();
        reversed.reverse();
        assert_eq!(evaluate(&reversed).unwrap(), base);
    }
}

#[test]
fn comparison_is_antisymmetric_and_reflexive() {
    for seed in 0..40u64 {
        let mut deck = Deck::new_with_seed(seed);
        let a = evaluate(&deck.draw(5).unwrap()).unwrap();
        let b = evaluate(&deck.draw(5).unwrap()).unwrap();
        assert_eq!(compare(&a, &b), compare(&b, &a).reverse());
        assert_eq!(compare(&a, &a), Ordering::Equal);
    }
}

#[test]
fn describe_names_the_category() {
    assert_eq!(
        describe(&hand("AS KS QS JS TS")).unwrap(),
        "AS KS QS JS TS (Straight Flush)"
    );
}
