//! Hangman server: player stats store plus server-side rounds over HTTP.

use std::{net::SocketAddr, sync::Arc, time::Duration, time::Instant};

use anyhow::{Context, Error};
use hangman::{MemoryStatsStore, StatsStore, db::Database};
use hm_server::{
    api,
    config::{CliOverrides, ServerConfig, StoreBackend},
    logging, metrics,
    sessions::GameSessions,
};
use log::info;
use pico_args::Arguments;

const HELP: &str = "\
Run the hangman server

USAGE:
  hm_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:5000]
  --db-url     URL         Database connection string  [default: env DATABASE_URL]

FLAGS:
  --memory                 Keep player stats in memory instead of PostgreSQL
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND                  Server bind address (e.g., 0.0.0.0:5000)
  DATABASE_URL                 PostgreSQL connection string
  STATS_BACKEND                postgres | memory
  PLAYER_CREATE_POLICY         preserve | overwrite
  HANGMAN_WORDS                Comma-separated word list
  SESSION_IDLE_TIMEOUT_SECS    Drop games idle this long
  METRICS_BIND                 Prometheus listener address
  (See .env file for all configuration options)
";

/// Longest pause between idle-session sweeps
const MAX_PRUNE_PERIOD: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let overrides = CliOverrides {
        bind: pargs.opt_value_from_str::<_, SocketAddr>("--bind")?,
        database_url: pargs.opt_value_from_str("--db-url")?,
        memory: pargs.contains("--memory"),
    };

    logging::init();

    let config = ServerConfig::from_env(overrides)?;
    config.validate()?;
    info!("Starting hangman server at {}", config.bind);

    if let Some(addr) = config.metrics_bind {
        metrics::init_metrics(addr)?;
        info!("Prometheus metrics at http://{addr}/metrics");
    }

    let (store, database): (Arc<dyn StatsStore>, Option<Database>) = match config.backend {
        StoreBackend::Postgres => {
            info!("Connecting to database");
            let db = Database::new(&config.database)
                .await
                .context("Failed to connect to database")?;

            let started = Instant::now();
            db.ensure_schema()
                .await
                .context("Failed to create hangman_players table")?;
            logging::log_performance("ensure_schema", started.elapsed(), Some("hangman_players"));

            let store = db.stats_store().with_policy(config.stats.create_policy);
            info!("Database connected successfully");
            (Arc::new(store), Some(db))
        }
        StoreBackend::Memory => {
            log::warn!("Using in-memory stats store; records are lost on shutdown");
            (
                Arc::new(MemoryStatsStore::with_policy(config.stats.create_policy)),
                None,
            )
        }
    };
    info!(
        "Stats backend: {} (create policy: {})",
        config.backend, config.stats.create_policy
    );

    let sessions = GameSessions::new(
        store.clone(),
        config.game.words.clone(),
        config.game.session_idle_timeout,
    );
    let state = api::AppState::new(store, sessions);
    let pruner = state
        .sessions
        .spawn_pruner(config.game.session_idle_timeout.min(MAX_PRUNE_PERIOD));

    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down server...");
    pruner.abort();
    if let Some(db) = database {
        db.close().await;
    }

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to install CTRL+C signal handler: {e}");
        std::future::pending::<()>().await;
    }
}
