//! Paced, cancellable playback of a recorded game.
//!
//! The engine feeds a recorded move sequence into a [`GameSession`] one move
//! at a time, sleeping a fixed interval before each. Cancellation is a flag
//! checked once per move, after the sleep and before the move is applied,
//! so a stop request can let at most one more move through.
//!
//! [`GameSession`]: crate::session::GameSession

use crate::history::MoveRecord;
use crate::session::{IgnoreReason, Mode, MoveOutcome, ReplayToken, SharedSession};
use derive_more::{Display, Error, From};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use xogame_core::{BoardError, Player};

/// Default pause before each replayed move.
pub const DEFAULT_REPLAY_INTERVAL: Duration = Duration::from_secs(1);

/// Errors starting or finishing a replay.
#[derive(Debug, Clone, Display, Error, From)]
pub enum ReplayError {
    /// Recorded grid size is unsupported.
    #[display("Cannot replay: {}", _0)]
    InvalidSize(BoardError),

    /// Another replay is already driving the session.
    #[from(ignore)]
    #[display("A replay is already running on this session")]
    AlreadyReplaying,

    /// Records span more than one game.
    #[from(ignore)]
    #[display("Cannot replay {games} games at once; pick one game")]
    MixedGames {
        /// Number of distinct games in the records.
        games: usize,
    },

    /// The playback task panicked or was aborted.
    #[from(ignore)]
    #[display("Replay task failed: {reason}")]
    Task {
        /// Why the task failed.
        reason: String,
    },
}

/// Summary of a finished replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplayReport {
    /// Moves placed on the board.
    pub applied: usize,
    /// Moves the session refused (occupied cell, game over, ...).
    pub ignored: usize,
    /// Whether playback stopped before the last move, either on request or
    /// because a new game replaced the replay.
    pub cancelled: bool,
}

/// Drives game sessions through recorded move sequences.
#[derive(Debug, Clone, Copy)]
pub struct ReplayEngine {
    interval: Duration,
}

impl Default for ReplayEngine {
    fn default() -> Self {
        Self::new(DEFAULT_REPLAY_INTERVAL)
    }
}

impl ReplayEngine {
    /// Creates an engine pausing `interval` before each move.
    #[instrument]
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Pause before each move.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Starts replaying `records` into `session`.
    ///
    /// Records must all belong to one game (see [`group_games`]) and are put
    /// in turn order first. The
    /// session is switched to replay mode on a fresh board sized from the
    /// first record (or its current size when there are none) before this
    /// returns, so direct moves are refused from here on.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::MixedGames`] if the records span several games,
    /// [`ReplayError::AlreadyReplaying`] if the session is already in replay
    /// mode, or [`ReplayError::InvalidSize`] if the recorded grid size is
    /// unsupported; in every case the session is left untouched.
    ///
    /// [`group_games`]: crate::history::group_games
    #[instrument(skip(self, records, session), fields(count = records.len()))]
    pub async fn start(
        &self,
        mut records: Vec<MoveRecord>,
        session: SharedSession,
    ) -> Result<ReplayHandle, ReplayError> {
        let games: BTreeSet<u32> = records.iter().map(|r| *r.game_counter()).collect();
        if games.len() > 1 {
            return Err(ReplayError::MixedGames { games: games.len() });
        }
        records.sort_by_key(|r| *r.turn_counter());

        let token = {
            let mut guard = session.lock().await;
            if guard.mode() == Mode::Replaying {
                return Err(ReplayError::AlreadyReplaying);
            }
            let size = records
                .first()
                .map(|r| *r.grid_size())
                .unwrap_or_else(|| guard.grid_size());
            guard.begin_replay(size)?
        };

        let cancelled = Arc::new(AtomicBool::new(false));
        let task = tokio::spawn(Self::play(
            records,
            session,
            self.interval,
            token,
            Arc::clone(&cancelled),
        ));

        info!(interval = ?self.interval, "Replay started");
        Ok(ReplayHandle {
            token,
            cancelled,
            task,
        })
    }

    async fn play(
        records: Vec<MoveRecord>,
        session: SharedSession,
        interval: Duration,
        token: ReplayToken,
        cancelled: Arc<AtomicBool>,
    ) -> ReplayReport {
        let mut report = ReplayReport::default();

        for record in records {
            tokio::time::sleep(interval).await;
            if cancelled.load(Ordering::SeqCst) {
                report.cancelled = true;
                break;
            }

            let player = (*record.player()).unwrap_or_else(|| {
                warn!(turn = record.turn_counter(), "Recorded move has no player, using X");
                Player::X
            });

            let outcome = session
                .lock()
                .await
                .apply_replay_move(token, *record.row(), *record.col(), player);
            match outcome {
                MoveOutcome::Ignored(IgnoreReason::StaleReplay) => {
                    info!("Replay superseded by a new game");
                    report.cancelled = true;
                    break;
                }
                MoveOutcome::Applied { status, turn } => {
                    debug!(turn, %status, "Replayed move");
                    report.applied += 1;
                }
                MoveOutcome::Ignored(reason) => {
                    debug!(%reason, turn = record.turn_counter(), "Replayed move ignored");
                    report.ignored += 1;
                }
            }
        }

        session.lock().await.end_replay(token);
        info!(
            applied = report.applied,
            ignored = report.ignored,
            cancelled = report.cancelled,
            "Replay finished"
        );
        report
    }
}

/// Control handle for a running replay.
#[derive(Debug)]
pub struct ReplayHandle {
    token: ReplayToken,
    cancelled: Arc<AtomicBool>,
    task: JoinHandle<ReplayReport>,
}

impl ReplayHandle {
    /// Requests cancellation.
    ///
    /// The playback task notices the request after its current pause; a move
    /// already past its pause may still be applied.
    #[instrument(skip(self))]
    pub fn stop(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        debug!("Replay stop requested");
    }

    /// Token the playback task drives the session with.
    pub fn token(&self) -> ReplayToken {
        self.token
    }

    /// Returns true once playback has ended.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for playback to end.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Task`] if the playback task panicked or was
    /// aborted.
    pub async fn finished(self) -> Result<ReplayReport, ReplayError> {
        self.task.await.map_err(|e| ReplayError::Task {
            reason: e.to_string(),
        })
    }
}
