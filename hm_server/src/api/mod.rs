//! HTTP API for the hangman server.
//!
//! # Modules
//!
//! - [`players`]: Player records and win/loss counters
//! - [`games`]: Server-side rounds
//! - [`request_id`]: Request correlation middleware
//!
//! # Endpoints Overview
//!
//! ## Players
//! - `POST /api/players` - Create a player `{playerName}`
//! - `GET /api/players?playerName=` - Read a player's record
//! - `PUT /api/players/stats` - Count one win or loss `{playerName, won}`
//!
//! ## Games
//! - `POST /api/games` - Start a round `{playerName}`
//! - `GET /api/games/{id}` - Current view of a round
//! - `POST /api/games/{id}/guess` - Guess a letter `{letter}`
//! - `POST /api/games/{id}/report` - Retry a failed stats update
//!
//! Every route is also served under `/api/v1`.
//!
//! ## Health Check
//! - `GET /health` - Server and stats store status
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use hm_server::api::{AppState, create_router};
//! use hm_server::sessions::GameSessions;
//! use hangman::{MemoryStatsStore, StatsStore, WordList};
//! use std::{sync::Arc, time::Duration};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store: Arc<dyn StatsStore> = Arc::new(MemoryStatsStore::new());
//! let sessions = GameSessions::new(store.clone(), WordList::default(), Duration::from_secs(3600));
//! let app = create_router(AppState::new(store, sessions));
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively so a browser front end on another
//! origin can call the API.

pub mod games;
pub mod players;
pub mod request_id;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn,
    response::IntoResponse,
    routing::{get, post, put},
};
use hangman::StatsStore;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::{metrics, sessions::GameSessions};

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; both fields are `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StatsStore>,
    pub sessions: Arc<GameSessions>,
}

impl AppState {
    pub fn new(store: Arc<dyn StatsStore>, sessions: GameSessions) -> Self {
        Self {
            store,
            sessions: Arc::new(sessions),
        }
    }
}

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Handler error: status plus `{"error": ...}` body
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Create the complete API router with all endpoints and middleware.
///
/// ```text
/// GET  /health
/// POST /api/players            (also /api/v1/players)
/// GET  /api/players
/// PUT  /api/players/stats
/// POST /api/games
/// GET  /api/games/{id}
/// POST /api/games/{id}/guess
/// POST /api/games/{id}/report
/// ```
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .nest("/api", api_routes())
        .layer(from_fn(metrics::track_http_metrics))
        .layer(from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/players",
            post(players::create_player).get(players::get_player),
        )
        .route("/players/stats", put(players::update_stats))
        .route("/games", post(games::start_game))
        .route("/games/{game_id}", get(games::get_game))
        .route("/games/{game_id}/guess", post(games::guess))
        .route("/games/{game_id}/report", post(games::report))
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` when the stats store answers, `503 Service Unavailable`
/// otherwise.
///
/// ```bash
/// curl http://localhost:5000/health
/// # {"status":"ok","version":"1.0.0","store":true,"activeGames":0,"timestamp":"..."}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let store_healthy = match state.store.health_check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, "Stats store health check failed");
            false
        }
    };

    let status_code = if store_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if store_healthy { "ok" } else { "unavailable" },
        "version": env!("CARGO_PKG_VERSION"),
        "store": store_healthy,
        "activeGames": state.sessions.len().await,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
