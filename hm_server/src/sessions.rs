//! Server-side game sessions.
//!
//! A session pairs one live [`Round`] with the player it belongs to. The
//! registry is a map of per-session mutexes: guesses on the same game
//! serialize, different games never contend past the map lookup.
//!
//! When a guess ends a round the session reports the outcome to the stats
//! store exactly once. A failed report leaves the round finished and the
//! report pending; `report` retries it.

use hangman::{
    GuessResult, Letter, Outcome, PlayerRecord, Round, RoundError, StatsError, StatsStore,
    WordList, random_index, start_round,
};
use serde::Serialize;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::{
    sync::{Mutex, RwLock},
    task::JoinHandle,
    time::Instant,
};
use uuid::Uuid;

use crate::{logging, metrics};

/// Session errors, mapped to HTTP statuses by the games API
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Game not found")]
    GameNotFound(Uuid),

    #[error("Player not found")]
    PlayerNotFound(String),

    #[error("Round is still in progress")]
    RoundInProgress,

    #[error(transparent)]
    Round(#[from] RoundError),

    #[error(transparent)]
    Stats(#[from] StatsError),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Where the end-of-round stats update stands
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReportState {
    /// Round still running
    NotDue,
    /// Round over, the last attempt failed with this client-safe message
    Failed(String),
    /// Round over and counted; the record after the increment
    Reported(PlayerRecord),
}

/// One player's live game
#[derive(Debug)]
pub struct GameSession {
    id: Uuid,
    player_name: String,
    round: Round,
    report: ReportState,
    last_active: Instant,
}

impl GameSession {
    fn view(&self) -> GameView {
        let (stats_reported, stats_error, record) = match &self.report {
            ReportState::NotDue => (false, None, None),
            ReportState::Failed(error) => (false, Some(error.clone()), None),
            ReportState::Reported(record) => (true, None, Some(record.clone())),
        };

        GameView {
            game_id: self.id,
            player_name: self.player_name.clone(),
            masked_word: self.round.masked_word(),
            word_length: self.round.word().len(),
            missed_letters: self
                .round
                .missed_letters()
                .iter()
                .map(|c| c.to_ascii_uppercase())
                .collect(),
            tries_left: self.round.tries_left(),
            outcome: self.round.outcome(),
            word: self.round.is_over().then(|| self.round.word().to_string()),
            message: self.round.end_message(),
            stats_reported,
            stats_error,
            record,
        }
    }
}

/// Client view of a game; the word is only revealed once the round is over
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub game_id: Uuid,
    pub player_name: String,
    pub masked_word: String,
    pub word_length: usize,
    pub missed_letters: Vec<char>,
    pub tries_left: usize,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub stats_reported: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<PlayerRecord>,
}

/// Result of a single guess
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessOutcome {
    #[serde(flatten)]
    pub result: GuessResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub game: GameView,
}

/// Registry of live game sessions
pub struct GameSessions {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<GameSession>>>>,
    store: Arc<dyn StatsStore>,
    words: WordList,
    select: fn(usize) -> usize,
    idle_timeout: Duration,
}

impl GameSessions {
    pub fn new(store: Arc<dyn StatsStore>, words: WordList, idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::default(),
            store,
            words,
            select: random_index,
            idle_timeout,
        }
    }

    /// Replace the uniform word pick, e.g. with a fixed index in tests
    pub fn with_selector(mut self, select: fn(usize) -> usize) -> Self {
        self.select = select;
        self
    }

    pub fn store(&self) -> &Arc<dyn StatsStore> {
        &self.store
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Start a round for an existing player
    ///
    /// # Errors
    ///
    /// * `SessionError::PlayerNotFound` - the player was never created
    /// * `SessionError::Stats` - the store could not be read
    pub async fn start(&self, player_name: &str) -> SessionResult<GameView> {
        let started = std::time::Instant::now();
        let lookup = self.store.get_player(player_name).await;
        logging::log_store_operation(
            "get_player",
            player_name,
            started.elapsed(),
            lookup.as_ref().err().map(|e| e.to_string()).as_deref(),
        );
        if lookup.is_err() {
            metrics::stats_store_errors_total("get_player");
        }
        if lookup?.is_none() {
            return Err(SessionError::PlayerNotFound(player_name.to_string()));
        }

        let round = start_round(&self.words, self.select)?;
        let session = GameSession {
            id: Uuid::new_v4(),
            player_name: player_name.to_string(),
            round,
            report: ReportState::NotDue,
            last_active: Instant::now(),
        };
        let view = session.view();

        let count = {
            let mut sessions = self.sessions.write().await;
            sessions.insert(session.id, Arc::new(Mutex::new(session)));
            sessions.len()
        };
        metrics::rounds_started_total();
        metrics::active_game_sessions(count);
        tracing::info!(game_id = %view.game_id, player_name = player_name, "Round started");

        Ok(view)
    }

    pub async fn view(&self, id: Uuid) -> SessionResult<GameView> {
        let session = self.session(id).await?;
        let session = session.lock().await;
        Ok(session.view())
    }

    /// Apply a guess and, when it ends the round, report the outcome
    ///
    /// # Errors
    ///
    /// * `SessionError::GameNotFound` - unknown or pruned game id
    /// * `SessionError::Round` - invalid input or the round is already over
    pub async fn guess(&self, id: Uuid, input: &str) -> SessionResult<GuessOutcome> {
        let letter = Letter::parse(input)?;
        let session = self.session(id).await?;
        let mut session = session.lock().await;
        session.last_active = Instant::now();

        let (round, result) = session.round.guess_letter(letter)?;
        session.round = round;

        if result.ended_round() {
            let outcome = session.round.outcome();
            metrics::rounds_completed_total(outcome);
            tracing::info!(
                game_id = %id,
                player_name = %session.player_name,
                outcome = %outcome,
                "Round finished"
            );
            self.report_outcome(&mut session).await;
        }

        Ok(GuessOutcome {
            result,
            notice: result.notice(letter),
            game: session.view(),
        })
    }

    /// Retry a failed end-of-round report
    ///
    /// Already reported rounds are returned as they are.
    ///
    /// # Errors
    ///
    /// * `SessionError::GameNotFound` - unknown or pruned game id
    /// * `SessionError::RoundInProgress` - nothing to report yet
    pub async fn report(&self, id: Uuid) -> SessionResult<GameView> {
        let session = self.session(id).await?;
        let mut session = session.lock().await;
        session.last_active = Instant::now();

        if session.report == ReportState::NotDue {
            return Err(SessionError::RoundInProgress);
        }
        if matches!(session.report, ReportState::Failed(_)) {
            self.report_outcome(&mut session).await;
        }
        Ok(session.view())
    }

    /// Drop sessions idle for longer than the configured timeout
    ///
    /// Sessions whose lock is held are in use and kept. An idle session with
    /// a failed report gets one more attempt; if that fails too it is kept
    /// so the result is not lost, and a later pass tries again.
    pub async fn prune_idle(&self) -> usize {
        let unreported: Vec<_> = self
            .sessions
            .read()
            .await
            .values()
            .filter(|session| {
                session.try_lock().is_ok_and(|session| {
                    session.last_active.elapsed() >= self.idle_timeout
                        && matches!(session.report, ReportState::Failed(_))
                })
            })
            .cloned()
            .collect();

        for session in unreported {
            let mut session = session.lock().await;
            if !matches!(session.report, ReportState::Failed(_)) {
                continue;
            }
            self.report_outcome(&mut session).await;
            if let ReportState::Failed(error) = &session.report {
                tracing::warn!(
                    game_id = %session.id,
                    player_name = %session.player_name,
                    outcome = %session.round.outcome(),
                    error = %error,
                    "Keeping idle session with an unsaved result"
                );
            }
        }

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| match session.try_lock() {
            Ok(session) => {
                session.last_active.elapsed() < self.idle_timeout
                    || matches!(session.report, ReportState::Failed(_))
            }
            Err(_) => true,
        });
        let removed = before - sessions.len();
        metrics::active_game_sessions(sessions.len());
        if removed > 0 {
            tracing::debug!(removed = removed, "Pruned idle game sessions");
        }
        removed
    }

    /// Run [`prune_idle`](Self::prune_idle) on a fixed period
    pub fn spawn_pruner(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let sessions = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                sessions.prune_idle().await;
            }
        })
    }

    async fn session(&self, id: Uuid) -> SessionResult<Arc<Mutex<GameSession>>> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(SessionError::GameNotFound(id))
    }

    async fn report_outcome(&self, session: &mut GameSession) {
        let won = session.round.outcome() == Outcome::Won;
        let started = std::time::Instant::now();
        let result = self.store.increment_stat(&session.player_name, won).await;

        match result {
            Ok(record) => {
                logging::log_store_operation(
                    "increment_stat",
                    &session.player_name,
                    started.elapsed(),
                    None,
                );
                metrics::stats_updates_total(won);
                session.report = ReportState::Reported(record);
            }
            Err(e) => {
                logging::log_store_operation(
                    "increment_stat",
                    &session.player_name,
                    started.elapsed(),
                    Some(&e.to_string()),
                );
                metrics::stats_store_errors_total("increment_stat");
                session.report = ReportState::Failed(e.client_message());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hangman::{MemoryStatsStore, StatsResult};
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Memory store whose increments fail while `down` is set
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStatsStore,
        down: AtomicBool,
    }

    #[async_trait]
    impl StatsStore for FlakyStore {
        async fn create_player(&self, player_name: &str) -> StatsResult<PlayerRecord> {
            self.inner.create_player(player_name).await
        }

        async fn get_player(&self, player_name: &str) -> StatsResult<Option<PlayerRecord>> {
            self.inner.get_player(player_name).await
        }

        async fn increment_stat(&self, player_name: &str, won: bool) -> StatsResult<PlayerRecord> {
            if self.down.load(Ordering::SeqCst) {
                return Err(StatsError::Unavailable("connection refused".to_string()));
            }
            self.inner.increment_stat(player_name, won).await
        }

        async fn health_check(&self) -> StatsResult<()> {
            Ok(())
        }
    }

    fn words() -> WordList {
        WordList::new(["Fun"]).unwrap()
    }

    async fn sessions_with(store: Arc<dyn StatsStore>) -> GameSessions {
        store.create_player("Ada").await.unwrap();
        GameSessions::new(store, words(), Duration::from_secs(60)).with_selector(|_| 0)
    }

    #[tokio::test]
    async fn test_start_requires_existing_player() {
        let sessions = sessions_with(Arc::new(MemoryStatsStore::new())).await;

        let err = sessions.start("Ghost").await.unwrap_err();
        assert!(matches!(err, SessionError::PlayerNotFound(_)));
        assert!(sessions.is_empty().await);

        let view = sessions.start("Ada").await.unwrap();
        assert_eq!(view.masked_word, "___");
        assert_eq!(view.tries_left, 6);
        assert_eq!(view.word, None);
        assert_eq!(sessions.len().await, 1);
    }

    #[tokio::test]
    async fn test_win_is_reported_once() {
        let store = Arc::new(MemoryStatsStore::new());
        let sessions = sessions_with(store.clone()).await;
        let id = sessions.start("Ada").await.unwrap().game_id;

        sessions.guess(id, "f").await.unwrap();
        sessions.guess(id, "u").await.unwrap();
        let last = sessions.guess(id, "N").await.unwrap();

        assert_eq!(last.result, GuessResult::Hit { won: true });
        assert_eq!(last.game.outcome, Outcome::Won);
        assert_eq!(last.game.word.as_deref(), Some("Fun"));
        assert!(last.game.stats_reported);
        assert_eq!(last.game.record.as_ref().map(|r| r.wins), Some(1));

        // Further guesses are refused and reporting again changes nothing
        assert!(matches!(
            sessions.guess(id, "x").await.unwrap_err(),
            SessionError::Round(RoundError::RoundClosed)
        ));
        sessions.report(id).await.unwrap();
        let record = store.get_player("Ada").await.unwrap().unwrap();
        assert_eq!((record.wins, record.losses), (1, 0));
    }

    #[tokio::test]
    async fn test_duplicate_guess_has_notice() {
        let sessions = sessions_with(Arc::new(MemoryStatsStore::new())).await;
        let id = sessions.start("Ada").await.unwrap().game_id;

        sessions.guess(id, "z").await.unwrap();
        let again = sessions.guess(id, "Z").await.unwrap();
        assert_eq!(again.result, GuessResult::AlreadyGuessed);
        assert_eq!(
            again.notice.as_deref(),
            Some("You already guessed the letter \"Z\"!")
        );
        assert_eq!(again.game.missed_letters, vec!['Z']);
        assert_eq!(again.game.tries_left, 5);
    }

    #[tokio::test]
    async fn test_failed_report_is_retried() {
        let store = Arc::new(FlakyStore::default());
        let sessions = sessions_with(store.clone()).await;
        let id = sessions.start("Ada").await.unwrap().game_id;

        assert!(matches!(
            sessions.report(id).await.unwrap_err(),
            SessionError::RoundInProgress
        ));

        store.down.store(true, Ordering::SeqCst);
        let mut last = None;
        for letter in ["z", "x", "q", "j", "v", "w"] {
            last = Some(sessions.guess(id, letter).await.unwrap());
        }
        let last = last.unwrap();
        assert_eq!(last.game.outcome, Outcome::Lost);
        assert!(!last.game.stats_reported);
        assert_eq!(last.game.stats_error.as_deref(), Some("Stats store unavailable"));

        // Still down: stays pending
        let view = sessions.report(id).await.unwrap();
        assert!(!view.stats_reported);

        store.down.store(false, Ordering::SeqCst);
        let view = sessions.report(id).await.unwrap();
        assert!(view.stats_reported);
        assert_eq!(view.record.map(|r| (r.wins, r.losses)), Some((0, 1)));
    }

    #[tokio::test]
    async fn test_invalid_input_and_unknown_game() {
        let sessions = sessions_with(Arc::new(MemoryStatsStore::new())).await;
        let id = sessions.start("Ada").await.unwrap().game_id;

        assert!(matches!(
            sessions.guess(id, "7").await.unwrap_err(),
            SessionError::Round(RoundError::InvalidInput(_))
        ));
        assert!(matches!(
            sessions.view(Uuid::new_v4()).await.unwrap_err(),
            SessionError::GameNotFound(_)
        ));
        assert!(sessions.view(id).await.unwrap().missed_letters.is_empty());
    }

    #[tokio::test]
    async fn test_prune_idle_sessions() {
        let store: Arc<dyn StatsStore> = Arc::new(MemoryStatsStore::new());
        store.create_player("Ada").await.unwrap();
        let sessions =
            GameSessions::new(store, words(), Duration::from_millis(10)).with_selector(|_| 0);

        sessions.start("Ada").await.unwrap();
        assert_eq!(sessions.prune_idle().await, 0);

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(sessions.prune_idle().await, 1);
        assert!(sessions.is_empty().await);
    }

    #[tokio::test]
    async fn test_prune_keeps_unsaved_results() {
        let store = Arc::new(FlakyStore::default());
        store.inner.create_player("Ada").await.unwrap();
        let sessions = GameSessions::new(store.clone(), words(), Duration::from_millis(10))
            .with_selector(|_| 0);
        let id = sessions.start("Ada").await.unwrap().game_id;

        store.down.store(true, Ordering::SeqCst);
        for letter in ["z", "x", "q", "j", "v", "w"] {
            sessions.guess(id, letter).await.unwrap();
        }
        tokio::time::sleep(Duration::from_millis(30)).await;

        // Store still down: the lost round is held back
        assert_eq!(sessions.prune_idle().await, 0);
        assert!(!sessions.view(id).await.unwrap().stats_reported);

        // Store back: pruning lands the result, then drops the session
        store.down.store(false, Ordering::SeqCst);
        assert_eq!(sessions.prune_idle().await, 1);
        assert!(sessions.is_empty().await);
        let record = store.get_player("Ada").await.unwrap().unwrap();
        assert_eq!((record.wins, record.losses), (0, 1));
    }
}
