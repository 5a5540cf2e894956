//! Game API handlers.
//!
//! Rounds played on the server. The word stays hidden until the round is
//! over; finishing a round updates the player's counters.
//!
//! # Examples
//!
//! ```bash
//! curl -X POST http://localhost:5000/api/games \
//!   -H "Content-Type: application/json" -d '{"playerName": "Ada"}'
//!
//! curl -X POST http://localhost:5000/api/games/GAME_ID/guess \
//!   -H "Content-Type: application/json" -d '{"letter": "e"}'
//! ```

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use hangman::{RoundError, StatsError};
use serde::Deserialize;
use uuid::Uuid;

use super::{ApiError, AppState, api_error};
use crate::sessions::{GameView, GuessOutcome, SessionError};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGameRequest {
    pub player_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GuessRequest {
    pub letter: Option<String>,
}

fn session_error(err: SessionError, failure_message: &str) -> ApiError {
    match err {
        SessionError::GameNotFound(_) => api_error(StatusCode::NOT_FOUND, err.to_string()),
        SessionError::PlayerNotFound(_) => api_error(StatusCode::NOT_FOUND, err.to_string()),
        SessionError::RoundInProgress => api_error(StatusCode::CONFLICT, err.to_string()),
        SessionError::Round(RoundError::RoundClosed) => {
            api_error(StatusCode::CONFLICT, "Round is over, start a new one")
        }
        SessionError::Round(RoundError::InvalidInput(_)) => {
            api_error(StatusCode::BAD_REQUEST, "Please enter a single letter")
        }
        SessionError::Round(e) => {
            tracing::error!(error = %e, "Word list misconfigured");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, failure_message)
        }
        SessionError::Stats(StatsError::Validation(message)) => {
            api_error(StatusCode::BAD_REQUEST, message)
        }
        SessionError::Stats(e) => {
            tracing::error!(error = %e, "{failure_message}");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, failure_message)
        }
    }
}

fn game_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|_| api_error(StatusCode::NOT_FOUND, "Game not found"))
}

/// Start a round for an existing player.
///
/// # Errors
///
/// - `400 Bad Request`: `playerName` missing or blank
/// - `404 Not Found`: `{"error": "Player not found"}`
/// - `500 Internal Server Error`: `{"error": "Failed to start game"}`
pub async fn start_game(
    State(state): State<AppState>,
    payload: Result<Json<StartGameRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<GameView>), ApiError> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let player_name = request
        .player_name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "Player name is required"))?;

    let view = state
        .sessions
        .start(&player_name)
        .await
        .map_err(|e| session_error(e, "Failed to start game"))?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// Current view of a round.
pub async fn get_game(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<GameView>, ApiError> {
    let id = game_id(path)?;
    let view = state
        .sessions
        .view(id)
        .await
        .map_err(|e| session_error(e, "Failed to get game"))?;
    Ok(Json(view))
}

/// Guess one letter.
///
/// # Response
///
/// `200 OK` with the result and the updated game:
/// ```json
/// {"result": "miss", "lost": false, "game": {"maskedWord": "T____", "triesLeft": 5, ...}}
/// ```
///
/// A guess that ends the round also updates the player's counters. If that
/// update fails the response is still `200` with `statsReported: false`
/// and a `statsError`; retry with the report endpoint.
///
/// # Errors
///
/// - `400 Bad Request`: input is not exactly one letter
/// - `404 Not Found`: unknown game
/// - `409 Conflict`: the round is already over
pub async fn guess(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<GuessRequest>, JsonRejection>,
) -> Result<Json<GuessOutcome>, ApiError> {
    let id = game_id(path)?;
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let letter = request.letter.unwrap_or_default();

    let outcome = state
        .sessions
        .guess(id, &letter)
        .await
        .map_err(|e| session_error(e, "Failed to apply guess"))?;
    Ok(Json(outcome))
}

/// Retry the stats update of a finished round.
///
/// # Errors
///
/// - `404 Not Found`: unknown game
/// - `409 Conflict`: the round is still in progress
pub async fn report(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<GameView>, ApiError> {
    let id = game_id(path)?;
    let view = state
        .sessions
        .report(id)
        .await
        .map_err(|e| session_error(e, "Failed to update player stats"))?;
    Ok(Json(view))
}
