use fivedraw_engine::agent::{BetDecision, DiscardDecision};
use fivedraw_engine::cards::parse_cards;
use fivedraw_engine::deck::Deck;
use fivedraw_engine::engine::{Hand, Phase};
use fivedraw_engine::errors::GameError;
use fivedraw_engine::player::{Controller, EventKind, Seat};
use fivedraw_engine::rules::{BettingAction, DecisionRules};

fn seat(id: usize, name: &str, stack: u32) -> Seat {
    Seat::new(id, name, Controller::External, stack)
}

fn rules(ante: u32) -> DecisionRules {
    DecisionRules {
        ante,
        ..DecisionRules::default()
    }
}

#[test]
fn bet_then_fold_ends_without_a_draw() {
    let seats = vec![seat(0, "A", 100), seat(1, "B", 100)];
    let mut hand = Hand::start(1, seats, rules(0), 5).unwrap();

    assert_eq!(hand.current_actor(), Some(0));
    hand.submit_bet(0, BetDecision::bet(10)).unwrap();
    assert_eq!(hand.current_actor(), Some(1));
    let ctx = hand.betting_context(1).unwrap();
    assert_eq!(ctx.to_call, 10);
    assert_eq!(
        ctx.available_actions,
        vec![BettingAction::Call, BettingAction::Raise, BettingAction::Fold]
    );
    hand.submit_bet(1, BetDecision::fold()).unwrap();

    assert_eq!(hand.phase(), Phase::Showdown);
    assert_eq!(hand.next_to_discard(), None);
    let result = hand.resolve().unwrap().clone();
    assert_eq!(result.pot, 10);
    assert_eq!(result.winners, vec![0]);
    assert_eq!(result.bankrolls.get(&0), Some(&100));
    assert_eq!(result.bankrolls.get(&1), Some(&100));
    for p in &result.players {
        assert!(p.discard_indices.is_empty());
        assert_eq!(p.hand_before, p.hand_after);
    }
    assert!(result.player(1).unwrap().folded);
    assert!(result.player(1).unwrap().final_eval.is_none());
    assert_eq!(hand.deck_remaining(), 42);
}

#[test]
fn short_call_goes_all_in_for_the_stack() {
    let seats = vec![seat(0, "A", 100), seat(1, "B", 15)];
    let mut hand = Hand::start(2, seats, rules(0), 8).unwrap();
    hand.submit_bet(0, BetDecision::bet(30)).unwrap();
    let ctx = hand.betting_context(1).unwrap();
    assert_eq!(ctx.to_call, 30);
    assert_eq!(ctx.available_actions, vec![BettingAction::Call, BettingAction::Fold]);

    let event = hand.submit_bet(1, BetDecision::call(30)).unwrap();
    assert_eq!(event.amount, 15);
    assert_eq!(event.stack_after, 0);

    let b = hand.player(1).unwrap();
    assert_eq!(b.committed, 15);
    assert!(b.all_in);
    assert_eq!(hand.pot(), 45);
    // all-in players still draw
    assert_eq!(hand.phase(), Phase::Draw);
    assert_eq!(hand.next_to_discard(), Some(0));
    hand.submit_discard(0, DiscardDecision::stand_pat()).unwrap();
    assert_eq!(hand.next_to_discard(), Some(1));
    hand.submit_discard(1, DiscardDecision::new(vec![0, 1])).unwrap();
    let result = hand.resolve().unwrap();
    assert_eq!(result.net_stack_change(), 0);
    let total: u32 = result.bankrolls.values().sum();
    assert_eq!(total, 115);
}

#[test]
fn three_way_split_gives_remainder_to_first_seat() {
    let deck = Deck::from_cards(
        parse_cards(
            "2C 3D 4H 5S 6C \
             2D 3H 4S 5C 6D \
             2H 3S 4C 5D 6H \
             AS KD 9C 8H 7D",
        )
        .unwrap(),
    );
    let seats = vec![
        seat(0, "A", 100),
        seat(1, "B", 100),
        seat(2, "C", 100),
        seat(3, "D", 100),
    ];
    let mut hand = Hand::with_deck(3, seats, rules(25), deck, 0).unwrap();
    assert_eq!(hand.pot(), 100);
    hand.submit_bet(0, BetDecision::bet(10)).unwrap();
    hand.submit_bet(1, BetDecision::call(10)).unwrap();
    hand.submit_bet(2, BetDecision::call(10)).unwrap();
    hand.submit_bet(3, BetDecision::fold()).unwrap();
    assert_eq!(hand.phase(), Phase::Draw);
    for id in 0..3 {
        hand.submit_discard(id, DiscardDecision::stand_pat()).unwrap();
    }
    let result = hand.resolve().unwrap();
    assert_eq!(result.pot, 130);
    assert_eq!(result.winners, vec![0, 1, 2]);
    let payouts: Vec<u32> = result
        .players
        .iter()
        .filter_map(|p| {
            p.betting_history
                .iter()
                .find(|e| e.action == EventKind::Payout)
                .map(|e| e.amount)
        })
        .collect();
    assert_eq!(payouts, vec![44, 43, 43]);
    assert_eq!(result.bankrolls.get(&0), Some(&109));
    assert_eq!(result.bankrolls.get(&3), Some(&75));
}

#[test]
fn illegal_submission_is_normalized_not_rejected() {
    let seats = vec![seat(0, "A", 100), seat(1, "B", 100)];
    let mut hand = Hand::start(4, seats, rules(0), 1).unwrap();
    hand.submit_bet(0, BetDecision::bet(20)).unwrap();
    // B cannot check facing a bet
    let event = hand.submit_bet(1, BetDecision::check()).unwrap();
    assert_eq!(event.action, EventKind::Call);
    assert_eq!(event.amount, 20);
    assert_eq!(hand.player(1).unwrap().fallbacks, 1);
}

#[test]
fn invalid_discard_uses_fallback() {
    let deck = Deck::from_cards(
        parse_cards("KH 3C KD 9S 2H  AS AD 7C 5H 4D  QC JC TC").unwrap(),
    );
    let seats = vec![seat(0, "A", 100), seat(1, "B", 100)];
    let mut hand = Hand::with_deck(5, seats, rules(0), deck, 0).unwrap();
    hand.submit_bet(0, BetDecision::check()).unwrap();
    hand.submit_bet(1, BetDecision::check()).unwrap();
    let applied = hand
        .submit_discard(0, DiscardDecision::new(vec![0, 0]))
        .unwrap();
    assert_eq!(applied.discard_indices, vec![1, 3, 4]);
    let a = hand.player(0).unwrap();
    assert_eq!(a.hand_after, parse_cards("KH QC KD JC TC").unwrap());
    assert_eq!(a.fallbacks, 1);
}

#[test]
fn acting_out_of_turn_or_after_folding_is_loud() {
    let seats = vec![seat(0, "A", 100), seat(1, "B", 100), seat(2, "C", 100)];
    let mut hand = Hand::start(6, seats, rules(0), 2).unwrap();
    assert_eq!(
        hand.submit_bet(2, BetDecision::check()).unwrap_err(),
        GameError::NotPlayersTurn {
            expected: Some(0),
            actual: 2
        }
    );
    hand.submit_bet(0, BetDecision::bet(10)).unwrap();
    hand.submit_bet(1, BetDecision::fold()).unwrap();
    assert_eq!(
        hand.submit_bet(1, BetDecision::call(10)).unwrap_err(),
        GameError::PlayerAlreadyFolded(1)
    );
    assert_eq!(
        hand.submit_bet(9, BetDecision::check()).unwrap_err(),
        GameError::UnknownPlayer(9)
    );
}

#[test]
fn events_trace_the_hand() {
    let seats = vec![seat(0, "A", 50), seat(1, "B", 50)];
    let mut hand = Hand::start(7, seats, rules(5), 3).unwrap();
    hand.auto_play().unwrap();
    let kinds: Vec<String> = hand
        .events()
        .iter()
        .map(|e| serde_json::to_value(e).unwrap()["type"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(kinds.first().map(String::as_str), Some("hand_start"));
    assert_eq!(kinds.last().map(String::as_str), Some("showdown"));
    assert_eq!(kinds.iter().filter(|k| *k == "discard").count(), 2);
}
