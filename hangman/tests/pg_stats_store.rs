//! Contract tests for the PostgreSQL stats store.
//!
//! These need a live database and are skipped unless `DATABASE_URL` is set.
//! They share one table, so they run serially and use per-test name
//! prefixes.

use hangman::db::{Database, DatabaseConfig, PgStatsStore};
use hangman::stats::{CreatePolicy, StatsError, StatsStore};
use serial_test::serial;
use std::sync::Arc;
use std::time::Duration;

/// Helper to connect, bootstrap the table and clear previous test rows
async fn setup_test_db(prefix: &str) -> Option<Database> {
    setup_test_db_with(prefix, Duration::from_secs(5)).await
}

async fn setup_test_db_with(prefix: &str, statement_timeout: Duration) -> Option<Database> {
    let database_url = std::env::var("DATABASE_URL").ok()?;
    let config = DatabaseConfig {
        statement_timeout,
        ..DatabaseConfig::with_url(database_url)
    };

    let db = Database::new(&config)
        .await
        .expect("Failed to create test database");
    db.ensure_schema().await.expect("Failed to create schema");

    sqlx::query("DELETE FROM hangman_players WHERE player_name LIKE $1")
        .bind(format!("{prefix}%"))
        .execute(db.pool())
        .await
        .expect("Failed to clean up test rows");

    Some(db)
}

#[tokio::test]
#[serial]
async fn test_pg_create_get_increment() {
    let Some(db) = setup_test_db("pg_basic_").await else {
        return;
    };
    let store = db.stats_store();

    let created = store.create_player("pg_basic_Ada").await.unwrap();
    assert_eq!((created.wins, created.losses), (0, 0));

    store.increment_stat("pg_basic_Ada", true).await.unwrap();
    let record = store.increment_stat("pg_basic_Ada", false).await.unwrap();
    assert_eq!((record.wins, record.losses), (1, 1));

    let read = store.get_player("pg_basic_Ada").await.unwrap().unwrap();
    assert_eq!(read, record);

    db.close().await;
}

#[tokio::test]
#[serial]
async fn test_pg_unknown_player() {
    let Some(db) = setup_test_db("pg_ghost_").await else {
        return;
    };
    let store = db.stats_store();

    assert!(store.get_player("pg_ghost_Ghost").await.unwrap().is_none());
    let err = store.increment_stat("pg_ghost_Ghost", false).await.unwrap_err();
    assert!(matches!(err, StatsError::NotFound(_)));
    assert!(store.get_player("pg_ghost_Ghost").await.unwrap().is_none());

    db.close().await;
}

#[tokio::test]
#[serial]
async fn test_pg_create_policies() {
    let Some(db) = setup_test_db("pg_policy_").await else {
        return;
    };

    let preserve = PgStatsStore::new(db.pool().clone());
    preserve.create_player("pg_policy_Ada").await.unwrap();
    preserve.increment_stat("pg_policy_Ada", true).await.unwrap();
    assert_eq!(preserve.create_player("pg_policy_Ada").await.unwrap().wins, 1);

    let overwrite = PgStatsStore::new(db.pool().clone()).with_policy(CreatePolicy::Overwrite);
    let reset = overwrite.create_player("pg_policy_Ada").await.unwrap();
    assert_eq!((reset.wins, reset.losses), (0, 0));

    db.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
async fn test_pg_concurrent_increments_all_land() {
    let Some(db) = setup_test_db("pg_race_").await else {
        return;
    };
    let store: Arc<dyn StatsStore> = Arc::new(db.stats_store());
    store.create_player("pg_race_Ada").await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..50 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store.increment_stat("pg_race_Ada", true).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let record = store.get_player("pg_race_Ada").await.unwrap().unwrap();
    assert_eq!(record.wins, 50);
    assert_eq!(record.losses, 0);

    db.close().await;
}

#[tokio::test]
#[serial]
async fn test_pg_timed_out_increment_does_not_apply() {
    let Some(db) = setup_test_db_with("pg_slow_", Duration::from_millis(200)).await else {
        return;
    };
    let store = db.stats_store();
    store.create_player("pg_slow_Ada").await.unwrap();

    // Same update as an increment, held past statement_timeout
    let err = sqlx::query(
        "UPDATE hangman_players SET wins = wins + 1
         WHERE player_name = $1 AND (SELECT true FROM pg_sleep(1))
         RETURNING wins",
    )
    .bind("pg_slow_Ada")
    .fetch_optional(db.pool())
    .await
    .unwrap_err();

    let code = err.as_database_error().and_then(|e| e.code()).map(|c| c.to_string());
    assert_eq!(code.as_deref(), Some("57014"), "expected query_canceled, got {err:?}");
    assert!(StatsError::from(err).is_unavailable());

    let record = store.get_player("pg_slow_Ada").await.unwrap().unwrap();
    assert_eq!((record.wins, record.losses), (0, 0));

    let record = store.increment_stat("pg_slow_Ada", true).await.unwrap();
    assert_eq!(record.wins, 1);

    db.close().await;
}
