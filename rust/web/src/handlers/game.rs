use crate::errors::IntoErrorResponse;
use crate::session::{GameConfig, ResetRequest, SessionError, SessionManager};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::reply::{self, Response};
use warp::Reply;

/// Creates a game session and deals its first hand.
///
/// # HTTP Method and Path
/// - **Method**: POST
/// - **Path**: `/api/games`
///
/// # Request Format
/// ```json
/// {
///   "seats": [
///     { "name": "Alice", "type": "human", "stack": 500 },
///     { "name": "Bot", "type": "heuristic", "stack": 500 }
///   ],
///   "rules": { "min_bet": 10, "ante": 5, "max_raises": 3, "max_discards": 5 },
///   "seed": 123,
///   "game_number": 1
/// }
/// ```
/// Only `seats` is required. Seat `type` is `human`, `random` (default) or
/// `heuristic`; `stack` defaults to 500.
///
/// # Response Format
/// - **Success (201 Created)**: `{ "game_id", "state", "result": null }`
/// - **Error (400 Bad Request)**: fewer than two seats, invalid rules or a
///   malformed body
pub async fn create_game(sessions: Arc<SessionManager>, body: Bytes) -> Response {
    let created = parse_body::<GameConfig>(&body).and_then(|config| sessions.create_game(config));
    match created {
        Ok(response) => success_response(StatusCode::CREATED, response),
        Err(err) => err.into_http_response(),
    }
}

/// Current state of a game and the result of its hand, once resolved.
///
/// - **Method**: GET
/// - **Path**: `/api/games/{game_id}`
/// - **Error (404 Not Found)**: no such game
pub async fn get_game(sessions: Arc<SessionManager>, game_id: String) -> Response {
    match sessions.game(&game_id) {
        Ok(response) => success_response(StatusCode::OK, response),
        Err(err) => err.into_http_response(),
    }
}

/// Applies one action to the hand in progress.
///
/// # HTTP Method and Path
/// - **Method**: POST
/// - **Path**: `/api/games/{game_id}/action`
///
/// # Request Format
/// One of:
/// ```json
/// { "type": "bet", "player_id": 0, "action": "raise", "amount": 30, "rationale": "strong" }
/// { "type": "discard", "player_id": 0, "discard_indices": [1, 4] }
/// { "type": "auto_bet" }
/// { "type": "auto_discard" }
/// { "type": "auto_play" }
/// ```
///
/// # Response Format
/// - **Success (200 OK)**: `{ "game_id", "state", "result" }`. A hand that
///   reaches its showdown is resolved in the same request.
/// - **Error (400 Bad Request)**: unknown type, wrong phase, not the
///   player's turn, an illegal bet or discard, or a hand already resolved
/// - **Error (404 Not Found)**: no such game
pub async fn submit_action(sessions: Arc<SessionManager>, game_id: String, body: Bytes) -> Response {
    let applied = parse_body(&body).and_then(|action| sessions.apply_action(&game_id, action));
    match applied {
        Ok(response) => success_response(StatusCode::OK, response),
        Err(err) => err.into_http_response(),
    }
}

/// Deals the next hand: `{ "seed": 7, "game_number": 2 }`, both optional
/// and the body may be empty.
///
/// - **Method**: POST
/// - **Path**: `/api/games/{game_id}/reset`
pub async fn reset_game(sessions: Arc<SessionManager>, game_id: String, body: Bytes) -> Response {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        Ok(ResetRequest::default())
    } else {
        parse_body(&body)
    };
    match request.and_then(|request| sessions.reset(&game_id, request)) {
        Ok(response) => success_response(StatusCode::OK, response),
        Err(err) => err.into_http_response(),
    }
}

/// - **Method**: DELETE
/// - **Path**: `/api/games/{game_id}`
/// - **Success (204 No Content)**, **Error (404 Not Found)**
pub async fn delete_game(sessions: Arc<SessionManager>, game_id: String) -> Response {
    match sessions.delete(&game_id) {
        Ok(()) => reply::with_status(reply::reply(), StatusCode::NO_CONTENT).into_response(),
        Err(err) => err.into_http_response(),
    }
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, SessionError> {
    serde_json::from_slice(body).map_err(|e| SessionError::InvalidRequest(e.to_string()))
}

fn success_response<T>(status: StatusCode, body: T) -> Response
where
    T: Serialize,
{
    reply::with_status(reply::json(&body), status).into_response()
}
