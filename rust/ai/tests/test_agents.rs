use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use fivedraw_ai::cache::DecisionCache;
use fivedraw_ai::create_agent;
use fivedraw_ai::heuristic::HeuristicAgent;
use fivedraw_ai::model::{BetMode, ModelAgent, ModelClient, ModelError, ModelRequest};
use fivedraw_ai::random::RandomAgent;
use fivedraw_engine::agent::{Agent, BettingContext, DecisionContext};
use fivedraw_engine::cards::parse_cards;
use fivedraw_engine::draw::FALLBACK_RATIONALE;
use fivedraw_engine::engine::Table;
use fivedraw_engine::player::{Controller, Seat};
use fivedraw_engine::rules::{available_actions, BettingAction, DecisionRules};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Replays canned responses and counts calls. Repeats the last response
/// once the script runs out.
struct Scripted {
    responses: VecDeque<Result<String, ModelError>>,
    last: Result<String, ModelError>,
    calls: Arc<AtomicUsize>,
}

impl Scripted {
    fn new(responses: Vec<Result<&str, ModelError>>) -> (Box<Self>, Arc<AtomicUsize>) {
        let responses: VecDeque<_> = responses
            .into_iter()
            .map(|r| r.map(str::to_string))
            .collect();
        let last = responses.back().cloned().unwrap_or(Err(ModelError::Empty));
        let calls = Arc::new(AtomicUsize::new(0));
        let client = Box::new(Self {
            responses,
            last,
            calls: Arc::clone(&calls),
        });
        (client, calls)
    }
}

impl ModelClient for Scripted {
    fn complete(&mut self, _request: &ModelRequest) -> Result<String, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses.pop_front().unwrap_or_else(|| self.last.clone())
    }
}

const CTX: DecisionContext = DecisionContext {
    game_id: 1,
    player_id: 0,
};

fn agent_with(responses: Vec<Result<&str, ModelError>>) -> (ModelAgent, Arc<AtomicUsize>) {
    let (client, calls) = Scripted::new(responses);
    let agent = ModelAgent::new("test-model")
        .with_client(client)
        .with_retries(3, Duration::ZERO);
    (agent, calls)
}

fn betting_ctx(stack: u32, to_call: u32) -> BettingContext {
    let rules = DecisionRules::default();
    BettingContext {
        game_id: 1,
        player_id: 0,
        pot: 40,
        to_call,
        current_bet: to_call,
        min_bet: rules.min_bet,
        min_raise: rules.min_raise(),
        stack,
        committed: 0,
        raises: 1,
        available_actions: available_actions(stack, to_call, 1, &rules),
    }
}

#[test]
fn model_discard_is_cached_across_suit_permutations() {
    let (mut agent, calls) = agent_with(vec![Ok(r#"{"discard_indices": [2, 3, 4], "rationale": "keep kings"}"#)]);
    let rules = DecisionRules::default();
    let mut rng = ChaCha20Rng::seed_from_u64(1);

    let first = parse_cards("KH KD 9S 3C 2H").unwrap();
    let d = agent.decide_discard(&first, &rules, &CTX, &mut rng).unwrap();
    assert_eq!(d.discard_indices, vec![2, 3, 4]);
    assert_eq!(d.rationale.as_deref(), Some("keep kings"));

    // same shape, different suits
    let second = parse_cards("KS KC 9D 3H 2S").unwrap();
    let d = agent.decide_discard(&second, &rules, &CTX, &mut rng).unwrap();
    assert_eq!(d.discard_indices, vec![2, 3, 4]);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let m = agent.metrics().unwrap();
    assert_eq!((m.cache_hits, m.cache_misses, m.api_calls), (1, 1, 1));
    assert_eq!(m.fallbacks, 0);
}

#[test]
fn cached_discard_follows_the_cards_into_new_slots() {
    let mut agent = ModelAgent::new("m");
    let rules = DecisionRules::default();
    let mut rng = ChaCha20Rng::seed_from_u64(3);

    let first = parse_cards("AS KS 2D 3C 4H").unwrap();
    let d = agent.decide_discard(&first, &rules, &CTX, &mut rng).unwrap();
    let thrown: Vec<String> = d.discard_indices.iter().map(|&i| first[i].to_string()).collect();
    assert_eq!(thrown, ["2D", "3C", "4H"]);

    let shuffled = parse_cards("4S 3D 2C KH AH").unwrap();
    let d = agent.decide_discard(&shuffled, &rules, &CTX, &mut rng).unwrap();
    let thrown: Vec<String> = d.discard_indices.iter().map(|&i| shuffled[i].to_string()).collect();
    assert_eq!(thrown, ["4S", "3D", "2C"]);

    let m = agent.metrics().unwrap();
    assert_eq!((m.cache_hits, m.cache_misses), (1, 1));
}

#[test]
fn unusable_answers_retry_then_fall_back() {
    let (mut agent, calls) = agent_with(vec![Ok("I would discard the nine"), Ok(r#"{"discard_indices": [0, 0]}"#)]);
    let hand = parse_cards("KH KD 9S 3C 2H").unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(2);
    let d = agent
        .decide_discard(&hand, &DecisionRules::default(), &CTX, &mut rng)
        .unwrap();
    assert_eq!(d.discard_indices, vec![2, 3, 4]);
    assert_eq!(d.rationale.as_deref(), Some(FALLBACK_RATIONALE));

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    let m = agent.metrics().unwrap();
    assert_eq!(m.api_calls, 3);
    assert_eq!(m.invalid_responses, 3);
    assert_eq!(m.fallbacks, 1);
}

#[test]
fn transient_failure_recovers_on_retry() {
    let (mut agent, _calls) = agent_with(vec![
        Err(ModelError::Transport("connection reset".to_string())),
        Ok(""),
        Ok(r#"{"discard_indices": [4]}"#),
    ]);
    let hand = parse_cards("4C 4D JH JS 9C").unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(3);
    let d = agent
        .decide_discard(&hand, &DecisionRules::default(), &CTX, &mut rng)
        .unwrap();
    assert_eq!(d.discard_indices, vec![4]);
    let m = agent.metrics().unwrap();
    assert_eq!((m.api_calls, m.invalid_responses, m.fallbacks), (3, 2, 0));
}

#[test]
fn discard_beyond_rule_limit_is_rejected() {
    let (mut agent, _calls) = agent_with(vec![Ok(r#"{"discard_indices": [0, 1, 2]}"#)]);
    let rules = DecisionRules {
        max_discards: 2,
        ..DecisionRules::default()
    };
    let hand = parse_cards("AS KD 7C 5H 2D").unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(4);
    let d = agent.decide_discard(&hand, &rules, &CTX, &mut rng).unwrap();
    assert_eq!(d.discard_indices, vec![3, 4]);
    assert_eq!(agent.metrics().unwrap().fallbacks, 1);
}

#[test]
fn without_a_client_the_agent_runs_offline() {
    let mut agent = ModelAgent::new("offline").with_bet_mode(BetMode::Model);
    let hand = parse_cards("7C 7D 7H AS 2C").unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(5);
    let d = agent
        .decide_discard(&hand, &DecisionRules::default(), &CTX, &mut rng)
        .unwrap();
    assert_eq!(d.discard_indices, vec![3, 4]);

    let ctx = betting_ctx(200, 20);
    let bet = agent.decide_bet(&hand, &ctx, &mut rng).unwrap();
    assert!(ctx.allows(bet.action));

    let m = agent.metrics().unwrap();
    assert_eq!(m.api_calls, 0);
    // only the discard fell back; betting without a client is the heuristic
    assert_eq!(m.fallbacks, 1);
}

#[test]
fn model_bets_are_validated() {
    let (agent, calls) = agent_with(vec![Ok(r#"{"action": "CALL", "amount": 20, "rationale": "priced in"}"#)]);
    let mut agent = agent.with_bet_mode(BetMode::Model);
    let hand = parse_cards("KH KD 9S 3C 2H").unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(6);
    let ctx = betting_ctx(200, 20);
    let d = agent.decide_bet(&hand, &ctx, &mut rng).unwrap();
    assert_eq!(d.action, BettingAction::Call);
    assert_eq!(d.amount, 20);
    assert_eq!(d.rationale.as_deref(), Some("priced in"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let (agent, _calls) = agent_with(vec![Ok(r#"{"action": "check"}"#)]);
    let mut agent = agent.with_bet_mode(BetMode::Model);
    let d = agent.decide_bet(&hand, &ctx, &mut rng).unwrap();
    // check is not offered when facing a bet; the heuristic answers instead
    assert!(ctx.allows(d.action));
    let m = agent.metrics().unwrap();
    assert_eq!((m.invalid_responses, m.fallbacks), (3, 1));

    let (agent, _calls) = agent_with(vec![Ok(r#"{"action": "raise", "amount": 5000}"#)]);
    let mut agent = agent.with_bet_mode(BetMode::Model);
    agent.decide_bet(&hand, &ctx, &mut rng).unwrap();
    assert_eq!(agent.metrics().unwrap().fallbacks, 1);
}

#[test]
fn heuristic_bet_mode_never_calls_the_model() {
    let (mut agent, calls) = agent_with(vec![Ok(r#"{"action": "fold"}"#)]);
    let hand = parse_cards("KH KD 9S 3C 2H").unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    let ctx = betting_ctx(200, 0);
    agent.decide_bet(&hand, &ctx, &mut rng).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn flushed_cache_serves_the_next_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("decisions.json");
    let hand = parse_cards("AS KD 7C 5H 2D").unwrap();
    let rules = DecisionRules::default();
    let mut rng = ChaCha20Rng::seed_from_u64(8);

    let (client, _calls) = Scripted::new(vec![Ok(r#"{"discard_indices": [3, 4], "rationale": "keep AK7"}"#)]);
    let mut first = ModelAgent::new("persisted")
        .with_client(client)
        .with_cache(DecisionCache::load(&path).unwrap())
        .with_retries(1, Duration::ZERO);
    first.decide_discard(&hand, &rules, &CTX, &mut rng).unwrap();
    first.flush().unwrap();
    assert!(path.exists());

    let mut second = ModelAgent::new("persisted").with_cache(DecisionCache::load(&path).unwrap());
    let d = second.decide_discard(&hand, &rules, &CTX, &mut rng).unwrap();
    assert_eq!(d.discard_indices, vec![3, 4]);
    assert_eq!(d.rationale.as_deref(), Some("keep AK7"));
    assert_eq!(second.metrics().unwrap().cache_hits, 1);

    // a different model name does not share entries
    let mut other = ModelAgent::new("other").with_cache(DecisionCache::load(&path).unwrap());
    other.decide_discard(&hand, &rules, &CTX, &mut rng).unwrap();
    assert_eq!(other.metrics().unwrap().cache_misses, 1);
}

#[test]
fn factory_builds_known_kinds_only() {
    assert_eq!(create_agent(" Heuristic ").unwrap().name(), "HeuristicAgent");
    assert_eq!(create_agent("random").unwrap().name(), "RandomAgent");
    let err = create_agent("oracle").err().unwrap();
    assert_eq!(err.0, "oracle");
    assert!(err.to_string().contains("Unknown agent type"));
}

#[test]
fn mixed_table_conserves_chips() {
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("cache.json");
    let seats = vec![
        Seat::new(0, "Rand", Controller::agent(RandomAgent::new()), 300),
        Seat::new(1, "Heur", Controller::agent(HeuristicAgent::new()), 300),
        Seat::new(
            2,
            "Model",
            Controller::agent(ModelAgent::new("offline").with_cache(DecisionCache::load(&cache_path).unwrap())),
            300,
        ),
    ];
    let rules = DecisionRules {
        ante: 5,
        max_discards: 3,
        ..DecisionRules::default()
    };
    let mut table = Table::new(seats, rules, Some(31)).unwrap();
    for game_id in 1..=150 {
        let result = table.play_hand(game_id).unwrap();
        assert_eq!(result.net_stack_change(), 0, "game {game_id}");
        assert_eq!(result.bankrolls.values().sum::<u32>(), 900, "game {game_id}");
        for p in &result.players {
            assert!(p.discard_indices.len() <= 3);
        }
    }
    assert!(table.flush_agents().is_empty());
    assert!(cache_path.exists());
}
