//! Entry point for presentation-layer events.
//!
//! A presentation layer (the console in this crate) forwards user intents
//! here and renders whatever the session publishes through [`subscribe`].
//!
//! [`subscribe`]: GameController::subscribe

use crate::history::MoveRecord;
use crate::replay::{ReplayEngine, ReplayError, ReplayHandle, ReplayReport};
use crate::session::{MoveOutcome, SessionSnapshot, SharedSession};
use tokio::sync::watch;
use tracing::{info, instrument, warn};
use xogame_core::BoardError;

/// Routes user intents to the shared game session and replay engine.
#[derive(Debug)]
pub struct GameController {
    session: SharedSession,
    engine: ReplayEngine,
    replay: Option<ReplayHandle>,
}

impl GameController {
    /// Creates a controller over `session`.
    pub fn new(session: SharedSession, engine: ReplayEngine) -> Self {
        Self {
            session,
            engine,
            replay: None,
        }
    }

    /// Shared session handle.
    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    /// Subscribes to session state changes.
    pub async fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.session.lock().await.subscribe()
    }

    /// Current session state.
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().await.snapshot()
    }

    /// Returns true while a replay is in progress.
    pub fn is_replaying(&self) -> bool {
        self.replay.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cell tapped by the current player.
    #[instrument(skip(self))]
    pub async fn on_cell_tap(&mut self, row: usize, col: usize) -> MoveOutcome {
        self.session.lock().await.tap(row, col)
    }

    /// New game of `size`, recorded as a new session.
    ///
    /// A running replay is stopped first.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidSize`] and leaves the game unchanged.
    #[instrument(skip(self))]
    pub async fn on_reset(&mut self, size: usize) -> Result<(), BoardError> {
        self.on_stop_replay().await;
        self.session.lock().await.reset(size)
    }

    /// New game of `size` within the current session.
    ///
    /// A running replay is stopped first.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidSize`] and leaves the game unchanged.
    #[instrument(skip(self))]
    pub async fn on_resize_grid(&mut self, size: usize) -> Result<(), BoardError> {
        self.on_stop_replay().await;
        self.session.lock().await.resize(size)
    }

    /// Starts replaying `records`, replacing any replay in progress.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] if the replay cannot start.
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub async fn on_start_replay(&mut self, records: Vec<MoveRecord>) -> Result<(), ReplayError> {
        self.on_stop_replay().await;
        let handle = self.engine.start(records, self.session.clone()).await?;
        self.replay = Some(handle);
        Ok(())
    }

    /// Stops the running replay and waits for it to wind down.
    ///
    /// Returns the report of the stopped replay, if one was active.
    #[instrument(skip(self))]
    pub async fn on_stop_replay(&mut self) -> Option<ReplayReport> {
        let handle = self.replay.take()?;
        let token = handle.token();
        handle.stop();
        match handle.finished().await {
            Ok(report) => {
                info!(applied = report.applied, "Replay stopped");
                Some(report)
            }
            Err(e) => {
                warn!(error = %e, "Replay ended abnormally");
                self.session.lock().await.end_replay(token);
                None
            }
        }
    }

    /// Waits for the running replay to play out.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Task`] if the playback task failed.
    #[instrument(skip(self))]
    pub async fn wait_for_replay(&mut self) -> Result<Option<ReplayReport>, ReplayError> {
        match self.replay.take() {
            Some(handle) => handle.finished().await.map(Some),
            None => Ok(None),
        }
    }
}
