use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use fivedraw_ai::heuristic::HeuristicAgent;
use fivedraw_ai::random::RandomAgent;
use fivedraw_engine::agent::{BetDecision, DiscardDecision};
use fivedraw_engine::cards::Card;
use fivedraw_engine::draw::validate_discard;
use fivedraw_engine::engine::{Hand, Phase, MAX_SEATS};
use fivedraw_engine::errors::GameError;
use fivedraw_engine::hand::HAND_SIZE;
use fivedraw_engine::logger::{GameResult, HandEvent};
use fivedraw_engine::player::{BettingEvent, Controller, RoundPlayer, Seat};
use fivedraw_engine::rules::{BettingAction, DecisionRules};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub type SessionId = String;

pub const DEFAULT_STACK: u32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatType {
    /// Driven through the action endpoint
    Human,
    #[default]
    Random,
    Heuristic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub seat_type: SeatType,
    #[serde(default = "default_stack")]
    pub stack: u32,
}

fn default_stack() -> u32 {
    DEFAULT_STACK
}

fn first_game() -> u64 {
    1
}

/// Body of `POST /api/games`. Kept with the session so a reset can rebuild
/// the table it started from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub seats: Vec<SeatConfig>,
    #[serde(default)]
    pub rules: DecisionRules,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "first_game")]
    pub game_number: u64,
}

/// Body of `POST /api/games/{id}/action`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionRequest {
    Bet {
        player_id: usize,
        action: BettingAction,
        #[serde(default)]
        amount: u32,
        #[serde(default)]
        rationale: Option<String>,
    },
    Discard {
        player_id: usize,
        #[serde(default)]
        discard_indices: Vec<usize>,
        #[serde(default)]
        rationale: Option<String>,
    },
    AutoBet,
    AutoDiscard,
    AutoPlay,
}

/// Body of `POST /api/games/{id}/reset`; every field may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub game_number: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerState {
    pub player_id: usize,
    pub name: String,
    pub hand: Vec<Card>,
    pub hand_after: Vec<Card>,
    pub starting_stack: u32,
    pub stack: u32,
    pub current_bet: u32,
    pub committed: u32,
    pub folded: bool,
    pub all_in: bool,
    pub is_human: bool,
    pub betting_history: Vec<BettingEvent>,
}

impl From<&RoundPlayer> for PlayerState {
    fn from(p: &RoundPlayer) -> Self {
        Self {
            player_id: p.id(),
            name: p.name().to_string(),
            hand: p.hand.clone(),
            hand_after: p.hand_after.clone(),
            starting_stack: p.starting_stack,
            stack: p.stack(),
            current_bet: p.current_bet,
            committed: p.committed,
            folded: p.folded,
            all_in: p.all_in,
            is_human: p.seat.controller.is_external(),
            betting_history: p.history.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HandState {
    pub game_id: u64,
    pub phase: Phase,
    pub pot: u32,
    pub current_bet: u32,
    pub active_player: Option<usize>,
    pub available_actions: Option<Vec<BettingAction>>,
    pub next_discard_player: Option<usize>,
    pub players: Vec<PlayerState>,
    pub events: Vec<HandEvent>,
}

impl From<&Hand> for HandState {
    fn from(hand: &Hand) -> Self {
        let active_player = hand.current_actor();
        let available_actions = active_player
            .and_then(|id| hand.betting_context(id).ok())
            .map(|ctx| ctx.available_actions);
        Self {
            game_id: hand.game_id(),
            phase: hand.phase(),
            pot: hand.pot(),
            current_bet: hand.current_bet(),
            active_player,
            available_actions,
            next_discard_player: hand.next_to_discard(),
            players: hand.players().iter().map(PlayerState::from).collect(),
            events: hand.events().to_vec(),
        }
    }
}

/// What every game endpoint answers with.
#[derive(Debug, Clone, Serialize)]
pub struct GameResponse {
    pub game_id: SessionId,
    pub state: HandState,
    pub result: Option<GameResult>,
}

/// One table and the hand currently dealt on it.
#[derive(Debug)]
pub struct GameSession {
    id: SessionId,
    config: GameConfig,
    // None only if dealing the next hand failed
    hand: Option<Hand>,
}

impl GameSession {
    pub fn new(id: SessionId, config: GameConfig) -> Result<Self, SessionError> {
        let seats = build_seats(&config.seats)?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let hand = Hand::start(config.game_number, seats, config.rules, seed)?;
        Ok(Self {
            id,
            config,
            hand: Some(hand),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn hand(&self) -> Result<&Hand, SessionError> {
        self.hand
            .as_ref()
            .ok_or_else(|| SessionError::EngineError("no hand dealt".to_string()))
    }

    fn hand_mut(&mut self) -> Result<&mut Hand, SessionError> {
        self.hand
            .as_mut()
            .ok_or_else(|| SessionError::EngineError("no hand dealt".to_string()))
    }

    pub fn snapshot(&self) -> Result<GameResponse, SessionError> {
        let hand = self.hand()?;
        Ok(GameResponse {
            game_id: self.id.clone(),
            state: HandState::from(hand),
            result: hand.result().cloned(),
        })
    }

    /// Applies one action. A hand left waiting for its showdown is resolved
    /// before returning.
    pub fn apply(&mut self, action: ActionRequest) -> Result<(), SessionError> {
        let hand = self.hand_mut()?;
        if hand.phase() == Phase::Complete {
            return Err(GameError::HandAlreadyComplete.into());
        }

        match action {
            ActionRequest::Bet {
                player_id,
                action,
                amount,
                rationale,
            } => {
                let decision = checked_bet(hand, player_id, action, amount)?;
                let decision = match rationale {
                    Some(r) => decision.with_rationale(r),
                    None => decision,
                };
                hand.submit_bet(player_id, decision)?;
            }
            ActionRequest::Discard {
                player_id,
                discard_indices,
                rationale,
            } => {
                if hand.phase() != Phase::Draw {
                    return Err(GameError::WrongPhase {
                        expected: Phase::Draw,
                        actual: hand.phase(),
                    }
                    .into());
                }
                if !validate_discard(&discard_indices, HAND_SIZE, hand.rules()) {
                    return Err(SessionError::InvalidAction(format!(
                        "discard_indices must be distinct slots below {} and at most {} of them",
                        HAND_SIZE,
                        hand.rules().max_discards
                    )));
                }
                let mut decision = DiscardDecision::new(discard_indices);
                decision.rationale = rationale;
                hand.submit_discard(player_id, decision)?;
            }
            ActionRequest::AutoBet => {
                hand.auto_bet()?;
            }
            ActionRequest::AutoDiscard => {
                hand.auto_discard()?;
            }
            ActionRequest::AutoPlay => {
                hand.auto_play()?;
            }
        }

        if hand.phase() == Phase::Showdown {
            hand.resolve()?;
        }
        Ok(())
    }

    /// Deals the next hand. Stacks carry over from a completed hand; an
    /// unfinished hand is abandoned and the seats are rebuilt from the
    /// configuration the session was created with.
    pub fn reset(&mut self, request: ResetRequest) -> Result<(), SessionError> {
        let carry_over = match self.hand.as_ref().and_then(Hand::result) {
            Some(result) => {
                let funded = result.bankrolls.values().filter(|&&stack| stack > 0).count();
                if funded < 2 {
                    return Err(GameError::NotEnoughFundedSeats.into());
                }
                true
            }
            None => false,
        };

        let game_number = request
            .game_number
            .or_else(|| self.hand.as_ref().map(|h| h.game_id() + 1))
            .unwrap_or(self.config.game_number);

        let seats = match self.hand.take() {
            Some(hand) if carry_over => hand.into_seats()?,
            _ => build_seats(&self.config.seats)?,
        };
        let seed = request.seed.unwrap_or_else(rand::random);
        self.hand = Some(Hand::start(game_number, seats, self.config.rules, seed)?);
        Ok(())
    }
}

/// Rejects bets the seat is not allowed to make instead of letting the
/// engine substitute its default.
fn checked_bet(
    hand: &Hand,
    player_id: usize,
    action: BettingAction,
    amount: u32,
) -> Result<BetDecision, SessionError> {
    let ctx = hand.betting_context(player_id)?;
    if !ctx.allows(action) {
        let legal: Vec<&str> = ctx.available_actions.iter().map(|a| a.as_str()).collect();
        return Err(SessionError::InvalidAction(format!(
            "{} is not available (legal: {})",
            action,
            legal.join(", ")
        )));
    }
    let floor = match action {
        BettingAction::Check | BettingAction::Fold => return Ok(BetDecision::new(action, 0)),
        BettingAction::Call => return Ok(BetDecision::call(ctx.to_call.min(ctx.stack))),
        BettingAction::Bet => ctx.min_bet.max(1),
        BettingAction::Raise => ctx.to_call.saturating_add(ctx.min_raise.max(1)),
    }
    .min(ctx.stack);
    if amount < floor || amount > ctx.stack {
        return Err(SessionError::InvalidAction(format!(
            "{} amount must be between {} and {}",
            action, floor, ctx.stack
        )));
    }
    Ok(BetDecision::new(action, amount))
}

fn build_seats(configs: &[SeatConfig]) -> Result<Vec<Seat>, SessionError> {
    if configs.len() < 2 {
        return Err(GameError::TooFewSeats(configs.len()).into());
    }
    if configs.len() > MAX_SEATS {
        return Err(GameError::TooManySeats {
            max: MAX_SEATS,
            actual: configs.len(),
        }
        .into());
    }
    let seats = configs
        .iter()
        .enumerate()
        .map(|(idx, cfg)| {
            let name = cfg.name.clone().unwrap_or_else(|| format!("Player {}", idx + 1));
            let controller = match cfg.seat_type {
                SeatType::Human => Controller::External,
                SeatType::Random => Controller::agent(RandomAgent::new()),
                SeatType::Heuristic => Controller::agent(HeuristicAgent::new()),
            };
            Seat::new(idx, name, controller, cfg.stack)
        })
        .collect();
    Ok(seats)
}

#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<GameSession>>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_game(&self, config: GameConfig) -> Result<GameResponse, SessionError> {
        let id = Uuid::new_v4().to_string();
        let session = GameSession::new(id.clone(), config)?;
        let response = session.snapshot()?;

        tracing::info!(
            session_id = %id,
            seats = session.config().seats.len(),
            game_id = response.state.game_id,
            "game session created"
        );

        let mut guard = self
            .sessions
            .write()
            .map_err(|_| SessionError::StoragePoisoned)?;
        guard.insert(id, Arc::new(Mutex::new(session)));
        Ok(response)
    }

    pub fn get_session(&self, id: &str) -> Result<Arc<Mutex<GameSession>>, SessionError> {
        let guard = self
            .sessions
            .read()
            .map_err(|_| SessionError::StoragePoisoned)?;
        guard
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    pub fn game(&self, id: &str) -> Result<GameResponse, SessionError> {
        self.with_session(id, |session| session.snapshot())
    }

    pub fn apply_action(&self, id: &str, action: ActionRequest) -> Result<GameResponse, SessionError> {
        tracing::debug!(session_id = %id, action = ?action, "applying action");
        self.with_session(id, |session| {
            session.apply(action)?;
            let response = session.snapshot()?;
            if let Some(result) = &response.result {
                tracing::info!(
                    session_id = %id,
                    game_id = result.game_id,
                    pot = result.pot,
                    winners = ?result.winners,
                    "hand resolved"
                );
            }
            Ok(response)
        })
    }

    pub fn reset(&self, id: &str, request: ResetRequest) -> Result<GameResponse, SessionError> {
        self.with_session(id, |session| {
            session.reset(request)?;
            let response = session.snapshot()?;
            tracing::info!(session_id = %id, game_id = response.state.game_id, "next hand dealt");
            Ok(response)
        })
    }

    pub fn delete(&self, id: &str) -> Result<(), SessionError> {
        let removed = self
            .sessions
            .write()
            .map_err(|_| SessionError::StoragePoisoned)?
            .remove(id);
        match removed {
            Some(_) => {
                tracing::info!(session_id = %id, "game session deleted");
                Ok(())
            }
            None => Err(SessionError::NotFound(id.to_string())),
        }
    }

    pub fn active_sessions(&self) -> Vec<SessionId> {
        match self.sessions.read() {
            Ok(guard) => guard.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    fn with_session<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut GameSession) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        let session = self.get_session(id)?;
        let mut guard = session.lock().map_err(|_| SessionError::StoragePoisoned)?;
        f(&mut guard)
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Game not found: {0}")]
    NotFound(SessionId),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Invalid action: {0}")]
    InvalidAction(String),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("Game engine error: {0}")]
    EngineError(String),
    #[error("Session storage poisoned")]
    StoragePoisoned,
}

impl crate::errors::IntoErrorResponse for SessionError {
    fn status_code(&self) -> warp::http::StatusCode {
        use warp::http::StatusCode;
        match self {
            SessionError::NotFound(_) => StatusCode::NOT_FOUND,
            SessionError::InvalidRequest(_) | SessionError::InvalidAction(_) => {
                StatusCode::BAD_REQUEST
            }
            SessionError::Game(GameError::ChipInvariant(_))
            | SessionError::Game(GameError::DeckExhausted { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            SessionError::Game(_) => StatusCode::BAD_REQUEST,
            SessionError::EngineError(_) | SessionError::StoragePoisoned => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            SessionError::NotFound(_) => "game_not_found",
            SessionError::InvalidRequest(_) => "invalid_request",
            SessionError::InvalidAction(_) => "invalid_action",
            SessionError::Game(GameError::WrongPhase { .. }) => "wrong_phase",
            SessionError::Game(GameError::NotPlayersTurn { .. }) => "not_players_turn",
            SessionError::Game(GameError::HandAlreadyComplete) => "hand_complete",
            SessionError::Game(_) => "game_error",
            SessionError::EngineError(_) => "engine_error",
            SessionError::StoragePoisoned => "session_storage_error",
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            SessionError::NotFound(id) => Some(serde_json::json!({ "game_id": id })),
            SessionError::Game(GameError::WrongPhase { expected, actual }) => {
                Some(serde_json::json!({ "expected": expected, "actual": actual }))
            }
            SessionError::Game(GameError::NotPlayersTurn { expected, actual }) => {
                Some(serde_json::json!({ "expected": expected, "player_id": actual }))
            }
            _ => None,
        }
    }

    fn severity(&self) -> crate::errors::ErrorSeverity {
        use crate::errors::ErrorSeverity;
        match self {
            SessionError::StoragePoisoned | SessionError::Game(GameError::ChipInvariant(_)) => {
                ErrorSeverity::Critical
            }
            SessionError::EngineError(_) => ErrorSeverity::Server,
            _ => ErrorSeverity::Client,
        }
    }
}
