//! Contract tests for the in-memory stats store.
//!
//! Covers creation, lookup, increments, the create policies and concurrent
//! same-key increments through `Arc<dyn StatsStore>`.

use hangman::stats::{CreatePolicy, MemoryStatsStore, PlayerRecord, StatsError, StatsStore};
use std::sync::Arc;

#[tokio::test]
async fn test_create_then_get() {
    let store = MemoryStatsStore::new();

    let created = store.create_player("Ada").await.unwrap();
    assert_eq!(created, PlayerRecord::new("Ada"));

    let fetched = store.get_player("Ada").await.unwrap().unwrap();
    assert_eq!((fetched.wins, fetched.losses), (0, 0));
}

#[tokio::test]
async fn test_names_are_case_sensitive() {
    let store = MemoryStatsStore::new();
    store.create_player("Ada").await.unwrap();

    assert!(store.get_player("ada").await.unwrap().is_none());
    assert!(store.increment_stat("ADA", true).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_unknown_player() {
    let store = MemoryStatsStore::new();

    assert_eq!(store.get_player("Ghost").await.unwrap(), None);

    let err = store.increment_stat("Ghost", true).await.unwrap_err();
    assert!(matches!(err, StatsError::NotFound(ref name) if name == "Ghost"));
    assert!(store.is_empty().await, "increment must never create");
}

#[tokio::test]
async fn test_blank_name_rejected() {
    let store = MemoryStatsStore::new();
    for name in ["", "   "] {
        let err = store.create_player(name).await.unwrap_err();
        assert!(matches!(err, StatsError::Validation(_)));
    }
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_increment_order_does_not_matter() {
    let store = MemoryStatsStore::new();
    store.create_player("a").await.unwrap();
    store.create_player("b").await.unwrap();

    store.increment_stat("a", true).await.unwrap();
    let a = store.increment_stat("a", false).await.unwrap();

    store.increment_stat("b", false).await.unwrap();
    let b = store.increment_stat("b", true).await.unwrap();

    assert_eq!((a.wins, a.losses), (1, 1));
    assert_eq!((b.wins, b.losses), (1, 1));
}

#[tokio::test]
async fn test_increment_is_visible_to_next_read() {
    let store = MemoryStatsStore::new().with_player(PlayerRecord {
        player_name: "Grace".to_string(),
        wins: 3,
        losses: 2,
    });

    let returned = store.increment_stat("Grace", false).await.unwrap();
    let read = store.get_player("Grace").await.unwrap().unwrap();
    assert_eq!(returned, read);
    assert_eq!((read.wins, read.losses), (3, 3));
    assert_eq!(read.games(), 6);
}

#[tokio::test]
async fn test_preserve_policy_keeps_counters() {
    let store = MemoryStatsStore::with_policy(CreatePolicy::Preserve);
    store.create_player("Ada").await.unwrap();
    store.increment_stat("Ada", true).await.unwrap();

    let again = store.create_player("Ada").await.unwrap();
    assert_eq!(again.wins, 1);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_overwrite_policy_resets_counters() {
    let store = MemoryStatsStore::with_policy(CreatePolicy::Overwrite);
    store.create_player("Ada").await.unwrap();
    store.increment_stat("Ada", true).await.unwrap();

    let again = store.create_player("Ada").await.unwrap();
    assert_eq!((again.wins, again.losses), (0, 0));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_get_or_create_player() {
    let store = MemoryStatsStore::new();

    let (record, created) = store.get_or_create_player("Ada").await.unwrap();
    assert!(created);
    assert_eq!(record, PlayerRecord::new("Ada"));

    store.increment_stat("Ada", true).await.unwrap();
    let (record, created) = store.get_or_create_player("Ada").await.unwrap();
    assert!(!created);
    assert_eq!(record.wins, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_increments_all_land() {
    let store: Arc<dyn StatsStore> = Arc::new(MemoryStatsStore::new());
    store.create_player("Ada").await.unwrap();

    let mut handles = Vec::new();
    for i in 0..100 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store.increment_stat("Ada", i % 4 != 0).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let record = store.get_player("Ada").await.unwrap().unwrap();
    assert_eq!(record.wins, 75);
    assert_eq!(record.losses, 25);
}

#[tokio::test]
async fn test_health_check() {
    assert!(MemoryStatsStore::new().health_check().await.is_ok());
}
