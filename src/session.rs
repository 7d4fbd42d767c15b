//! Game session: the single owner of live game state.
//!
//! A [`GameSession`] owns the board, whose turn it is, the game status, and
//! the turn and game counters. Every accepted change publishes a fresh
//! [`SessionSnapshot`] to subscribers and, for live play, emits a
//! [`HistoryEvent`] to the history writer.

use crate::history::{HistoryEvent, HistorySink, MoveRecord};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, instrument, warn};
use xogame_core::{Board, BoardError, GameStatus, Mark, Player, evaluate};

/// Game session shared between the presentation layer and the replay engine.
pub type SharedSession = Arc<Mutex<GameSession>>;

/// Who is allowed to place marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Mode {
    /// Moves come from the players.
    #[default]
    Interactive,
    /// Moves come from the replay engine.
    Replaying,
}

/// Why a move was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum IgnoreReason {
    /// The game has already been won or drawn.
    #[display("game is over")]
    GameOver,
    /// The cell is outside the current grid.
    #[display("cell is off the board")]
    OutOfBounds,
    /// The cell already holds a mark.
    #[display("cell is occupied")]
    OccupiedCell,
    /// A replay is driving the session.
    #[display("a replay is running")]
    ReplayActive,
    /// A replay move arrived while no replay is running.
    #[display("no replay is running")]
    NotReplaying,
    /// The replay sending the move has been replaced by a newer game.
    #[display("replay was superseded")]
    StaleReplay,
}

/// Identifies one replay run on a session.
///
/// Issued by [`GameSession::begin_replay`]. Any new game (reset, resize, or
/// another replay) invalidates all earlier tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReplayToken(u64);

/// Result of offering a move to the session.
///
/// Ignored moves leave the session untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The mark was placed.
    Applied {
        /// Status after the move.
        status: GameStatus,
        /// Turn counter after the move.
        turn: u32,
    },
    /// The move was a no-op.
    Ignored(IgnoreReason),
}

impl MoveOutcome {
    /// Returns true if the mark was placed.
    pub fn is_applied(&self) -> bool {
        matches!(self, MoveOutcome::Applied { .. })
    }
}

/// Observable view of a session, published on every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    /// Current board.
    pub board: Board,
    /// Player whose mark the next tap places.
    pub current_player: Player,
    /// Game status.
    pub status: GameStatus,
    /// Grid dimension.
    pub grid_size: usize,
    /// Moves made in the current game.
    pub turn_counter: u32,
    /// Games played since the session was created.
    pub game_counter: u32,
    /// Who is driving the session.
    pub mode: Mode,
}

/// Live game state with its history and observer hooks.
#[derive(Debug)]
pub struct GameSession {
    board: Board,
    current_player: Player,
    status: GameStatus,
    turn_counter: u32,
    game_counter: u32,
    mode: Mode,
    generation: u64,
    history: HistorySink,
    observers: watch::Sender<SessionSnapshot>,
}

impl GameSession {
    /// Player who opens every game.
    pub const FIRST_PLAYER: Player = Player::X;

    /// Creates the startup session with a board of `grid_size`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidSize`] if `grid_size` is unsupported.
    #[instrument(skip(history))]
    pub fn new(grid_size: usize, history: HistorySink) -> Result<Self, BoardError> {
        let board = Board::new(grid_size)?;
        let initial = SessionSnapshot {
            board: board.clone(),
            current_player: Self::FIRST_PLAYER,
            status: GameStatus::Ongoing,
            grid_size,
            turn_counter: 0,
            game_counter: 1,
            mode: Mode::Interactive,
        };
        let (observers, _) = watch::channel(initial);

        info!(grid_size, "Game session created");
        Ok(Self {
            board,
            current_player: Self::FIRST_PLAYER,
            status: GameStatus::Ongoing,
            turn_counter: 0,
            game_counter: 1,
            mode: Mode::Interactive,
            generation: 0,
            history,
            observers,
        })
    }

    /// Wraps the session for sharing with a replay engine.
    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player whose mark the next tap places.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns the grid dimension.
    pub fn grid_size(&self) -> usize {
        self.board.size()
    }

    /// Moves made in the current game.
    pub fn turn_counter(&self) -> u32 {
        self.turn_counter
    }

    /// Games played since the session was created, starting at 1.
    pub fn game_counter(&self) -> u32 {
        self.game_counter
    }

    /// Who is driving the session.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Captures the current observable state.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            board: self.board.clone(),
            current_player: self.current_player,
            status: self.status,
            grid_size: self.board.size(),
            turn_counter: self.turn_counter,
            game_counter: self.game_counter,
            mode: self.mode,
        }
    }

    /// Subscribes to state changes.
    ///
    /// The receiver starts out holding the current snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.observers.subscribe()
    }

    fn publish(&self) {
        self.observers.send_replace(self.snapshot());
    }

    /// Places the current player's mark; the interactive tap.
    #[instrument(skip(self), fields(player = %self.current_player))]
    pub fn tap(&mut self, row: usize, col: usize) -> MoveOutcome {
        self.apply_move(row, col, self.current_player)
    }

    /// Places `player`'s mark and records the move.
    ///
    /// Ignored while a replay is running.
    #[instrument(skip(self), fields(game = self.game_counter))]
    pub fn apply_move(&mut self, row: usize, col: usize, player: Player) -> MoveOutcome {
        if self.mode == Mode::Replaying {
            warn!("Move rejected while replay is running");
            return MoveOutcome::Ignored(IgnoreReason::ReplayActive);
        }

        let outcome = self.place(row, col, player);
        if let MoveOutcome::Applied { turn, .. } = outcome {
            self.history.emit(HistoryEvent::MoveApplied(MoveRecord::new(
                self.board.size(),
                row,
                col,
                Some(player),
                turn,
                self.game_counter,
            )));
        }
        outcome
    }

    /// Places `player`'s mark on behalf of the replay identified by `token`.
    ///
    /// Nothing is recorded. Ignored unless that replay is still the one
    /// driving the session.
    #[instrument(skip(self), fields(game = self.game_counter))]
    pub fn apply_replay_move(
        &mut self,
        token: ReplayToken,
        row: usize,
        col: usize,
        player: Player,
    ) -> MoveOutcome {
        if token.0 != self.generation {
            debug!(?token, "Replay move from superseded replay");
            return MoveOutcome::Ignored(IgnoreReason::StaleReplay);
        }
        if self.mode != Mode::Replaying {
            warn!("Replay move rejected outside replay");
            return MoveOutcome::Ignored(IgnoreReason::NotReplaying);
        }
        self.place(row, col, player)
    }

    fn place(&mut self, row: usize, col: usize, player: Player) -> MoveOutcome {
        if self.status.is_terminal() {
            debug!(status = ?self.status, "Move ignored, game over");
            return MoveOutcome::Ignored(IgnoreReason::GameOver);
        }

        match self.board.get(row, col) {
            Err(_) => {
                debug!(size = self.board.size(), "Move ignored, off the board");
                return MoveOutcome::Ignored(IgnoreReason::OutOfBounds);
            }
            Ok(Mark::Occupied(_)) => {
                debug!("Move ignored, cell occupied");
                return MoveOutcome::Ignored(IgnoreReason::OccupiedCell);
            }
            Ok(Mark::Empty) => {}
        }

        if self.board.set(row, col, Mark::Occupied(player)).is_err() {
            return MoveOutcome::Ignored(IgnoreReason::OutOfBounds);
        }
        self.turn_counter += 1;
        self.status = evaluate(&self.board, player);

        if self.status.is_terminal() {
            info!(status = %self.status, turn = self.turn_counter, "Game finished");
        } else {
            self.current_player = self.current_player.opponent();
        }

        self.publish();
        MoveOutcome::Applied {
            status: self.status,
            turn: self.turn_counter,
        }
    }

    /// Starts a new game of `size` and records a new session.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidSize`] without touching the current game.
    #[instrument(skip(self))]
    pub fn reset(&mut self, size: usize) -> Result<(), BoardError> {
        self.start_game(size)?;
        self.history.emit(HistoryEvent::SessionStarted {
            started_at: Utc::now(),
            grid_size: size,
        });
        self.publish();
        Ok(())
    }

    /// Starts a new game of `size` without recording a new session.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidSize`] without touching the current game.
    #[instrument(skip(self))]
    pub fn resize(&mut self, size: usize) -> Result<(), BoardError> {
        self.start_game(size)?;
        self.publish();
        Ok(())
    }

    /// Hands the session to the replay engine on a fresh board of `size`.
    ///
    /// The returned token must accompany every replayed move.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidSize`] without touching the current game.
    #[instrument(skip(self))]
    pub fn begin_replay(&mut self, size: usize) -> Result<ReplayToken, BoardError> {
        self.start_game(size)?;
        self.mode = Mode::Replaying;
        info!(game = self.game_counter, "Replay mode entered");
        self.publish();
        Ok(ReplayToken(self.generation))
    }

    /// Returns control to the players if `token`'s replay is still active.
    #[instrument(skip(self))]
    pub fn end_replay(&mut self, token: ReplayToken) {
        if token.0 != self.generation {
            debug!(?token, "End of superseded replay ignored");
            return;
        }
        if self.mode == Mode::Replaying {
            self.mode = Mode::Interactive;
            info!("Replay mode left");
            self.publish();
        }
    }

    fn start_game(&mut self, size: usize) -> Result<(), BoardError> {
        let board = Board::new(size)?;
        self.board = board;
        self.current_player = Self::FIRST_PLAYER;
        self.status = GameStatus::Ongoing;
        self.turn_counter = 0;
        self.game_counter += 1;
        self.generation += 1;
        self.mode = Mode::Interactive;
        info!(size, game = self.game_counter, "New game started");
        Ok(())
    }
}
