//! Draw detection for N×N tic-tac-toe.

use crate::Board;
use tracing::instrument;

/// Checks if the board is full (all cells occupied).
///
/// A full board with no winner indicates a draw.
#[instrument(skip(board), fields(size = board.size()))]
pub fn is_full(board: &Board) -> bool {
    board.is_full()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Mark, Player};

    #[test]
    fn test_empty_board_not_full() {
        let board = Board::new(3).unwrap();
        assert!(!is_full(&board));
    }

    #[test]
    fn test_partial_board_not_full() {
        let mut board = Board::new(3).unwrap();
        board.set(1, 1, Mark::Occupied(Player::X)).unwrap();
        assert!(!is_full(&board));
    }

    #[test]
    fn test_full_board() {
        let mut board = Board::new(6).unwrap();
        for r in 0..6 {
            for c in 0..6 {
                let player = if (r + c) % 2 == 0 { Player::X } else { Player::O };
                board.set(r, c, Mark::Occupied(player)).unwrap();
            }
        }
        assert!(is_full(&board));
    }
}
