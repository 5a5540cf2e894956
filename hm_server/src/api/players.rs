//! Player API handlers.
//!
//! Thin HTTP wrappers over the stats store. Request bodies are parsed
//! leniently: a missing or malformed field yields the same 400 message as an
//! empty one.
//!
//! # Examples
//!
//! ```bash
//! curl -X POST http://localhost:5000/api/players \
//!   -H "Content-Type: application/json" -d '{"playerName": "Ada"}'
//!
//! curl "http://localhost:5000/api/players?playerName=Ada"
//!
//! curl -X PUT http://localhost:5000/api/players/stats \
//!   -H "Content-Type: application/json" -d '{"playerName": "Ada", "won": true}'
//! ```

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use hangman::{PlayerRecord, StatsError};
use serde::Deserialize;
use std::time::Instant;

use super::{ApiError, AppState, api_error, request_id::RequestId};
use crate::{logging, metrics};

const NAME_REQUIRED: &str = "Player name is required";
const NAME_AND_WON_REQUIRED: &str = "Player name and won status are required";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayerRequest {
    pub player_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerQuery {
    pub player_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatsRequest {
    pub player_name: Option<String>,
    pub won: Option<bool>,
}

/// Non-blank name from an optional field
fn required_name(name: Option<String>) -> Option<String> {
    name.filter(|n| !n.trim().is_empty())
}

/// Map a store failure to a response, logging it once
fn store_failure(
    request_id: &RequestId,
    operation: &'static str,
    player_name: &str,
    started: Instant,
    err: StatsError,
    failure_message: &str,
) -> ApiError {
    match err {
        StatsError::Validation(message) => api_error(StatusCode::BAD_REQUEST, message),
        StatsError::NotFound(_) => {
            tracing::debug!(request_id = request_id.as_str(), player_name, "Player not found");
            api_error(StatusCode::NOT_FOUND, err.client_message())
        }
        StatsError::Unavailable(_) => {
            tracing::error!(request_id = request_id.as_str(), error = %err, "{failure_message}");
            logging::log_store_operation(
                operation,
                player_name,
                started.elapsed(),
                Some(&err.to_string()),
            );
            metrics::stats_store_errors_total(operation);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, failure_message)
        }
    }
}

/// Create a player with zeroed counters.
///
/// # Response
///
/// `201 Created` with the record:
/// ```json
/// {"playerName": "Ada", "wins": 0, "losses": 0}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: `{"error": "Player name is required"}`
/// - `500 Internal Server Error`: `{"error": "Failed to create player"}`
pub async fn create_player(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<CreatePlayerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PlayerRecord>), ApiError> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let player_name = required_name(request.player_name)
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, NAME_REQUIRED))?;

    let started = Instant::now();
    let record = state
        .store
        .create_player(&player_name)
        .await
        .map_err(|e| {
            store_failure(
                &request_id,
                "create_player",
                &player_name,
                started,
                e,
                "Failed to create player",
            )
        })?;

    logging::log_store_operation("create_player", &player_name, started.elapsed(), None);
    metrics::create_player_requests_total();
    Ok((StatusCode::CREATED, Json(record)))
}

/// Read a player's record.
///
/// # Errors
///
/// - `400 Bad Request`: `playerName` missing or blank
/// - `404 Not Found`: `{"error": "Player not found"}`
/// - `500 Internal Server Error`: `{"error": "Failed to get player"}`
pub async fn get_player(
    State(state): State<AppState>,
    request_id: RequestId,
    query: Result<Query<PlayerQuery>, QueryRejection>,
) -> Result<Json<PlayerRecord>, ApiError> {
    let player_name = query
        .ok()
        .and_then(|Query(q)| required_name(q.player_name))
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, NAME_REQUIRED))?;

    let started = Instant::now();
    let record = state
        .store
        .get_player(&player_name)
        .await
        .map_err(|e| {
            store_failure(
                &request_id,
                "get_player",
                &player_name,
                started,
                e,
                "Failed to get player",
            )
        })?;

    logging::log_store_operation("get_player", &player_name, started.elapsed(), None);
    record
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Player not found"))
}

/// Add one win (`won: true`) or one loss to a player.
///
/// # Response
///
/// `200 OK` with the record after the increment.
///
/// # Errors
///
/// - `400 Bad Request`: `{"error": "Player name and won status are required"}`
/// - `404 Not Found`: the player was never created
/// - `500 Internal Server Error`: `{"error": "Failed to update player stats"}`
pub async fn update_stats(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<UpdateStatsRequest>, JsonRejection>,
) -> Result<Json<PlayerRecord>, ApiError> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let (Some(player_name), Some(won)) = (required_name(request.player_name), request.won) else {
        return Err(api_error(StatusCode::BAD_REQUEST, NAME_AND_WON_REQUIRED));
    };

    let started = Instant::now();
    let record = state
        .store
        .increment_stat(&player_name, won)
        .await
        .map_err(|e| {
            store_failure(
                &request_id,
                "increment_stat",
                &player_name,
                started,
                e,
                "Failed to update player stats",
            )
        })?;

    logging::log_store_operation("increment_stat", &player_name, started.elapsed(), None);
    metrics::stats_updates_total(won);
    Ok(Json(record))
}
