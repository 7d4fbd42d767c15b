//! Game rules for N×N tic-tac-toe.
//!
//! This module contains pure functions for evaluating a board snapshot.
//! Rules are separated from board storage so the session layer can apply
//! them after every placement without owning any rule logic itself.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::has_won;

use crate::{Board, GameStatus, Player};
use tracing::{debug, instrument};

/// Evaluates the board after `last_player` has moved.
///
/// A placement can only complete a line for the player who made it, so
/// only that player's lines are checked. The draw test runs only when no
/// win was found.
#[instrument(skip(board), fields(size = board.size()))]
pub fn evaluate(board: &Board, last_player: Player) -> GameStatus {
    let status = if has_won(board, last_player) {
        GameStatus::Won(last_player)
    } else if is_full(board) {
        GameStatus::Draw
    } else {
        GameStatus::Ongoing
    };
    debug!(?status, "Board evaluated");
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Mark;

    fn board_from(rows: &[&str]) -> Board {
        let mut board = Board::new(rows.len()).unwrap();
        for (r, line) in rows.iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                let mark = match ch {
                    'X' => Mark::Occupied(Player::X),
                    'O' => Mark::Occupied(Player::O),
                    _ => Mark::Empty,
                };
                board.set(r, c, mark).unwrap();
            }
        }
        board
    }

    #[test]
    fn test_evaluate_main_diagonal_win() {
        // X(0,0) O(1,0) X(1,1) O(2,0) X(2,2)
        let board = board_from(&["X..", "OX.", "O.X"]);
        assert_eq!(evaluate(&board, Player::X), GameStatus::Won(Player::X));
    }

    #[test]
    fn test_evaluate_draw() {
        let board = board_from(&["XOX", "OXX", "OXO"]);
        assert_eq!(evaluate(&board, Player::O), GameStatus::Draw);
    }

    #[test]
    fn test_evaluate_win_on_full_board_beats_draw() {
        let board = board_from(&["XOX", "OXO", "OXX"]);
        assert_eq!(evaluate(&board, Player::X), GameStatus::Won(Player::X));
    }

    #[test]
    fn test_evaluate_ongoing() {
        let board = board_from(&["X...", ".O..", "....", "...."]);
        assert_eq!(evaluate(&board, Player::O), GameStatus::Ongoing);
    }

    #[test]
    fn test_evaluate_only_checks_mover() {
        // O holds a full row, but X just moved; X has no line.
        let board = board_from(&["OOO", "XX.", "X.."]);
        assert_eq!(evaluate(&board, Player::X), GameStatus::Ongoing);
    }
}
