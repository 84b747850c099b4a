//! # fivedraw_web
//!
//! REST service for driving five-card draw hands over HTTP. Each game is a
//! session holding one table; clients create it, step through the hand
//! one action at a time (or let the agents play it out), and deal the
//! next hand with a reset.
//!
//! Routes:
//!
//! - `GET /health`
//! - `POST /api/games`
//! - `GET /api/games/{id}` and `DELETE /api/games/{id}`
//! - `POST /api/games/{id}/action`
//! - `POST /api/games/{id}/reset`

pub mod errors;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod server;
pub mod session;

pub use errors::{ErrorResponse, ErrorSeverity, IntoErrorResponse};
pub use logging::{init_logging, init_test_logging, CaptureLayer, LogEntry, TestLogSubscriber};
pub use middleware::{log_response, with_request_logging};
pub use server::{AppContext, ServerConfig, ServerError, ServerHandle, WebServer};
pub use session::{
    ActionRequest, GameConfig, GameResponse, GameSession, HandState, PlayerState, ResetRequest,
    SeatConfig, SeatType, SessionError, SessionId, SessionManager,
};
