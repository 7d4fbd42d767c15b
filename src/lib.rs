//! xogame - N×N tic-tac-toe with recorded history and replay
//!
//! # Architecture
//!
//! - **Session**: single owner of the live board, turn and counters
//! - **History**: fire-and-forget move log with SQLite and in-memory stores
//! - **Replay**: paced, cancellable playback of a recorded game
//! - **Controller**: routes presentation events to the session and replay
//! - **Console**: line-oriented terminal front end
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use xogame::{GameController, GameSession, HistoryWriter, MemoryHistory, ReplayEngine};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let (sink, writer) = HistoryWriter::spawn(Arc::new(MemoryHistory::new()));
//! let session = GameSession::new(3, sink)?.into_shared();
//! let mut controller = GameController::new(session, ReplayEngine::default());
//!
//! controller.on_reset(3).await?;
//! controller.on_cell_tap(1, 1).await;
//!
//! drop(controller);
//! writer.await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod console;
mod controller;
mod db;
mod history;
mod replay;
mod session;

// Crate-level exports - Configuration
pub use config::{AppConfig, ConfigError};

// Crate-level exports - Console front end
pub use console::{
    ConsoleCommand, HELP, ParseCommandError, render, run_play, run_replay, spawn_renderer,
};

// Crate-level exports - Controller
pub use controller::GameController;

// Crate-level exports - History
pub use db::SqliteHistory;
pub use history::{
    HistoryError, HistoryErrorKind, HistoryEvent, HistoryLog, HistorySink, HistoryWriter,
    MemoryHistory, MoveRecord, SessionId, SessionRecord, group_games,
};

// Crate-level exports - Replay
pub use replay::{DEFAULT_REPLAY_INTERVAL, ReplayEngine, ReplayError, ReplayHandle, ReplayReport};

// Crate-level exports - Session
pub use session::{
    GameSession, IgnoreReason, Mode, MoveOutcome, ReplayToken, SessionSnapshot, SharedSession,
};

// Crate-level exports - Game types
pub use xogame_core::{
    Board, BoardError, GameStatus, MAX_GRID_SIZE, MIN_GRID_SIZE, Mark, Player, evaluate,
};
