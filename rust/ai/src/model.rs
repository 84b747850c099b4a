//! Agent backed by a remote completion model.
//!
//! The transport is abstracted behind [`ModelClient`]; this crate ships no
//! network client, so a `ModelAgent` without one runs entirely on its cache
//! and the conservative fallbacks. Every model answer is parsed and
//! validated here before it reaches the engine.

use std::fmt;
use std::str::FromStr;
use std::thread;
use std::time::Duration;

use fivedraw_engine::agent::{
    Agent, AgentError, AgentMetrics, BetDecision, BettingContext, DecisionContext, DiscardDecision,
};
use fivedraw_engine::cards::Card;
use fivedraw_engine::draw::{fallback_discard, validate_discard};
use fivedraw_engine::hand::evaluate;
use fivedraw_engine::rules::{BettingAction, DecisionRules};
use rand::RngCore;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::{cache_key, from_canonical, to_canonical, DecisionCache};
use crate::heuristic::heuristic_bet;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(500);

pub const DISCARD_SYSTEM_PROMPT: &str = "You are a poker assistant playing Five-card draw.\n\
Rules: one draw round; you may discard 0-5 cards once; unknown cards are uniformly random.\n\
Goal: maximize final 5-card hand strength.\n\
Reply with a JSON object {\"discard_indices\": [..], \"rationale\": \"..\"} and nothing else.";

pub const BET_SYSTEM_PROMPT: &str = "You are a poker betting assistant for Five-card draw.\n\
Only one betting round occurs before the draw.\n\
Choose the best action among the allowed options.\n\
If the evaluated hand is already strong (pairs or better), favour aggressive betting and raising.\n\
Reply with a JSON object {\"action\": \"..\", \"amount\": 0, \"rationale\": \"..\"} and nothing else.";

/// One completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub model: String,
    pub system: &'static str,
    pub payload: serde_json::Value,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("model transport error: {0}")]
    Transport(String),
    #[error("model returned an empty response")]
    Empty,
}

/// Transport to a completion model. Returns the raw response text.
pub trait ModelClient: Send {
    fn complete(&mut self, request: &ModelRequest) -> Result<String, ModelError>;
}

/// Where betting decisions come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BetMode {
    /// Local strength-driven policy, no model calls
    #[default]
    Heuristic,
    Model,
}

impl fmt::Display for BetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetMode::Heuristic => f.write_str("heuristic"),
            BetMode::Model => f.write_str("model"),
        }
    }
}

impl FromStr for BetMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heuristic" => Ok(BetMode::Heuristic),
            "model" | "llm" => Ok(BetMode::Model),
            other => Err(format!("unknown bet mode: {other} (expected heuristic or model)")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawBet {
    action: String,
    #[serde(default)]
    amount: u32,
    #[serde(default)]
    rationale: Option<String>,
}

pub struct ModelAgent {
    name: String,
    model: String,
    client: Option<Box<dyn ModelClient>>,
    cache: DecisionCache,
    max_retries: u32,
    backoff: Duration,
    bet_mode: BetMode,
    metrics: AgentMetrics,
}

impl fmt::Debug for ModelAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelAgent")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("has_client", &self.client.is_some())
            .field("cached", &self.cache.len())
            .field("bet_mode", &self.bet_mode)
            .field("metrics", &self.metrics)
            .finish()
    }
}

impl ModelAgent {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            name: "ModelAgent".to_string(),
            model: model.into(),
            client: None,
            cache: DecisionCache::in_memory(),
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: DEFAULT_BACKOFF,
            bet_mode: BetMode::default(),
            metrics: AgentMetrics::default(),
        }
    }

    pub fn with_client(mut self, client: Box<dyn ModelClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn with_cache(mut self, cache: DecisionCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_bet_mode(mut self, bet_mode: BetMode) -> Self {
        self.bet_mode = bet_mode;
        self
    }

    /// At least one attempt is always made.
    pub fn with_retries(mut self, max_retries: u32, backoff: Duration) -> Self {
        self.max_retries = max_retries.max(1);
        self.backoff = backoff;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn bet_mode(&self) -> BetMode {
        self.bet_mode
    }

    pub fn cache(&self) -> &DecisionCache {
        &self.cache
    }

    /// Calls the model until `parse` accepts an answer or retries run out.
    /// Waits `backoff * 2^(attempt - 1)` between attempts.
    fn call_with_retries<T>(
        &mut self,
        request: &ModelRequest,
        parse: impl Fn(&str) -> Result<T, String>,
    ) -> Option<T> {
        let client = self.client.as_mut()?;
        for attempt in 1..=self.max_retries {
            self.metrics.api_calls += 1;
            let outcome = client
                .complete(request)
                .map_err(|e| e.to_string())
                .and_then(|text| {
                    if text.trim().is_empty() {
                        Err(ModelError::Empty.to_string())
                    } else {
                        parse(&text)
                    }
                });
            match outcome {
                Ok(value) => return Some(value),
                Err(reason) => {
                    self.metrics.invalid_responses += 1;
                    warn!(model = %self.model, attempt, %reason, "model call failed");
                    if attempt < self.max_retries && !self.backoff.is_zero() {
                        thread::sleep(self.backoff * 2u32.pow(attempt - 1));
                    }
                }
            }
        }
        None
    }

    fn discard_from_model(&mut self, hand: &[Card], rules: &DecisionRules) -> Option<DiscardDecision> {
        let request = ModelRequest {
            model: self.model.clone(),
            system: DISCARD_SYSTEM_PROMPT,
            payload: json!({
                "hand": hand.iter().map(ToString::to_string).collect::<Vec<_>>(),
                "rules": { "max_discards": rules.max_discards },
                "task": "Return indices of cards to discard (0-4).",
            }),
        };
        let hand_size = hand.len();
        let rules = *rules;
        self.call_with_retries(&request, move |text| {
            let decision: DiscardDecision =
                serde_json::from_str(text.trim()).map_err(|e| format!("unparseable discard: {e}"))?;
            if validate_discard(&decision.discard_indices, hand_size, &rules) {
                Ok(decision)
            } else {
                Err(format!("illegal discard {:?}", decision.discard_indices))
            }
        })
    }

    fn bet_from_model(&mut self, hand: &[Card], ctx: &BettingContext) -> Option<BetDecision> {
        let hand_rank = evaluate(hand).map(|e| e.name()).unwrap_or("unknown");
        let request = ModelRequest {
            model: self.model.clone(),
            system: BET_SYSTEM_PROMPT,
            payload: json!({
                "hand": hand.iter().map(ToString::to_string).collect::<Vec<_>>(),
                "hand_rank": hand_rank,
                "pot": ctx.pot,
                "to_call": ctx.to_call,
                "current_bet": ctx.current_bet,
                "stack": ctx.stack,
                "min_bet": ctx.min_bet,
                "min_raise": ctx.min_raise,
                "available_actions": ctx.available_actions,
            }),
        };
        let allowed = ctx.available_actions.clone();
        let stack = ctx.stack;
        self.call_with_retries(&request, move |text| {
            let raw: RawBet =
                serde_json::from_str(text.trim()).map_err(|e| format!("unparseable bet: {e}"))?;
            let action: BettingAction = raw.action.parse()?;
            if !allowed.contains(&action) {
                return Err(format!("action {action} not available"));
            }
            if raw.amount > stack {
                return Err(format!("amount {} exceeds stack {stack}", raw.amount));
            }
            Ok(BetDecision {
                action,
                amount: raw.amount,
                rationale: raw.rationale,
            })
        })
    }
}

impl Agent for ModelAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide_discard(
        &mut self,
        hand: &[Card],
        rules: &DecisionRules,
        ctx: &DecisionContext,
        _rng: &mut dyn RngCore,
    ) -> Result<DiscardDecision, AgentError> {
        let key = cache_key(&self.model, rules.max_discards, hand);
        if let Some(cached) = self.cache.get(&key).and_then(|stored| from_canonical(hand, stored)) {
            self.metrics.cache_hits += 1;
            debug!(game_id = ctx.game_id, player_id = ctx.player_id, %key, "discard cache hit");
            return Ok(cached);
        }
        self.metrics.cache_misses += 1;

        let decision = match self.discard_from_model(hand, rules) {
            Some(decision) => decision,
            None => {
                self.metrics.fallbacks += 1;
                fallback_discard(hand, rules)
            }
        };
        self.cache.insert(key, to_canonical(hand, &decision));
        Ok(decision)
    }

    fn decide_bet(
        &mut self,
        hand: &[Card],
        ctx: &BettingContext,
        rng: &mut dyn RngCore,
    ) -> Result<BetDecision, AgentError> {
        if self.bet_mode == BetMode::Model && self.client.is_some() {
            if let Some(decision) = self.bet_from_model(hand, ctx) {
                return Ok(decision);
            }
            self.metrics.fallbacks += 1;
        }
        heuristic_bet(hand, ctx, rng)
    }

    fn flush(&mut self) -> Result<(), AgentError> {
        self.cache.flush().map_err(|e| AgentError::Failed(e.to_string()))
    }

    fn metrics(&self) -> Option<AgentMetrics> {
        Some(self.metrics)
    }
}
