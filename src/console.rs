//! Line-oriented terminal presentation.
//!
//! Rendering is push-based: a task subscribed to the session redraws the
//! board whenever a new snapshot is published. Input is read line by line
//! and turned into controller calls.

use crate::controller::GameController;
use crate::history::MoveRecord;
use crate::replay::ReplayReport;
use crate::session::{Mode, MoveOutcome, SessionSnapshot};
use anyhow::Result;
use derive_more::{Display, Error};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

/// Help text for the play loop.
pub const HELP: &str = "\
Commands:
  <row> <col>    place the current player's mark (0-based)
  reset [size]   start a new recorded session (default: current size)
  resize <size>  start a new game of another size (3-10)
  help           show this help
  quit           leave the game";

/// A parsed line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Tap a cell.
    Tap {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
    },
    /// Reset, optionally to another size.
    Reset(Option<usize>),
    /// Resize the grid.
    Resize(usize),
    /// Show help.
    Help,
    /// Leave the game.
    Quit,
}

/// Input line that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Unrecognised input '{input}' (type 'help')")]
pub struct ParseCommandError {
    /// The offending line.
    pub input: String,
}

impl std::str::FromStr for ConsoleCommand {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let err = || ParseCommandError {
            input: line.trim().to_string(),
        };
        let words: Vec<&str> = line.split_whitespace().collect();

        match words.as_slice() {
            ["quit"] | ["exit"] | ["q"] => Ok(Self::Quit),
            ["help"] | ["?"] => Ok(Self::Help),
            ["reset"] => Ok(Self::Reset(None)),
            ["reset", size] => size.parse().map(|s| Self::Reset(Some(s))).map_err(|_| err()),
            ["resize", size] => size.parse().map(Self::Resize).map_err(|_| err()),
            [row, col] => match (row.parse(), col.parse()) {
                (Ok(row), Ok(col)) => Ok(Self::Tap { row, col }),
                _ => Err(err()),
            },
            _ => Err(err()),
        }
    }
}

/// Renders a snapshot as text.
pub fn render(snapshot: &SessionSnapshot) -> String {
    let mut out = format!(
        "Game {} | {}x{} | turn {}",
        snapshot.game_counter, snapshot.grid_size, snapshot.grid_size, snapshot.turn_counter
    );
    if snapshot.mode == Mode::Replaying {
        out.push_str(" | replaying");
    }
    out.push('\n');
    out.push_str(&snapshot.board.display());
    out.push('\n');
    if snapshot.status.is_terminal() {
        out.push_str(&snapshot.status.to_string());
    } else {
        out.push_str(&format!("Current Player: {}", snapshot.current_player));
    }
    out
}

/// Spawns a task printing every published snapshot.
///
/// The task ends when the session is dropped.
pub fn spawn_renderer(mut rx: watch::Receiver<SessionSnapshot>) -> JoinHandle<()> {
    tokio::spawn(async move {
        println!("{}\n", render(&rx.borrow_and_update()));
        while rx.changed().await.is_ok() {
            let text = render(&rx.borrow_and_update());
            println!("{}\n", text);
        }
        debug!("Renderer stopped");
    })
}

/// Runs the interactive play loop on stdin until `quit` or end of input.
///
/// # Errors
///
/// Returns an error if stdin cannot be read.
#[instrument(skip(controller))]
pub async fn run_play(controller: &mut GameController) -> Result<()> {
    let renderer = spawn_renderer(controller.subscribe().await);
    println!("{}\n", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<ConsoleCommand>() {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match command {
            ConsoleCommand::Tap { row, col } => {
                if let MoveOutcome::Ignored(reason) = controller.on_cell_tap(row, col).await {
                    println!("Move ignored: {}", reason);
                }
            }
            ConsoleCommand::Reset(size) => {
                let size = match size {
                    Some(size) => size,
                    None => controller.snapshot().await.grid_size,
                };
                if let Err(e) = controller.on_reset(size).await {
                    println!("{}", e);
                }
            }
            ConsoleCommand::Resize(size) => {
                if let Err(e) = controller.on_resize_grid(size).await {
                    println!("{}", e);
                }
            }
            ConsoleCommand::Help => println!("{}", HELP),
            ConsoleCommand::Quit => break,
        }
    }

    renderer.abort();
    info!("Play loop finished");
    Ok(())
}

/// Replays `records` with live rendering; Ctrl-C stops playback early.
///
/// # Errors
///
/// Returns an error if the replay cannot start or its task fails.
#[instrument(skip(controller, records), fields(count = records.len()))]
pub async fn run_replay(
    controller: &mut GameController,
    records: Vec<MoveRecord>,
) -> Result<Option<ReplayReport>> {
    controller.on_start_replay(records).await?;
    let mut rx = controller.subscribe().await;
    let renderer = spawn_renderer(rx.clone());

    let interrupted = tokio::select! {
        _ = rx.wait_for(|s| s.mode == Mode::Interactive) => false,
        _ = tokio::signal::ctrl_c() => true,
    };

    let report = if interrupted {
        println!("Stopping replay...");
        controller.on_stop_replay().await
    } else {
        controller.wait_for_replay().await?
    };

    // Let the renderer print the final snapshot before shutting it down.
    tokio::task::yield_now().await;
    renderer.abort();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistorySink;
    use crate::session::GameSession;

    #[test]
    fn test_parse_commands() {
        assert_eq!("1 2".parse(), Ok(ConsoleCommand::Tap { row: 1, col: 2 }));
        assert_eq!(" reset ".parse(), Ok(ConsoleCommand::Reset(None)));
        assert_eq!("reset 5".parse(), Ok(ConsoleCommand::Reset(Some(5))));
        assert_eq!("resize 4".parse(), Ok(ConsoleCommand::Resize(4)));
        assert_eq!("quit".parse(), Ok(ConsoleCommand::Quit));
        assert_eq!("help".parse(), Ok(ConsoleCommand::Help));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("1".parse::<ConsoleCommand>().is_err());
        assert!("a b".parse::<ConsoleCommand>().is_err());
        assert!("resize big".parse::<ConsoleCommand>().is_err());
        assert!("-1 0".parse::<ConsoleCommand>().is_err());
    }

    #[test]
    fn test_render_shows_next_player_then_result() {
        let mut session = GameSession::new(3, HistorySink::discard()).unwrap();
        let text = render(&session.snapshot());
        assert!(text.starts_with("Game 1 | 3x3 | turn 0"));
        assert!(text.ends_with("Current Player: X"));

        for (row, col) in [(0, 0), (1, 0), (1, 1), (2, 0), (2, 2)] {
            session.tap(row, col);
        }
        let text = render(&session.snapshot());
        assert!(text.contains("X|.|."));
        assert!(text.ends_with("X wins!"));
    }
}
