//! Win detection for N×N tic-tac-toe.

use crate::{Board, Mark, Player};
use tracing::instrument;

/// Checks whether `player` owns a complete row, column, or main diagonal.
///
/// Lines are tested rows first, then columns, then the main diagonal, then
/// the anti-diagonal; the first complete line short-circuits.
#[instrument(skip(board), fields(size = board.size()))]
pub fn has_won(board: &Board, player: Player) -> bool {
    let n = board.size();
    let mark = Mark::Occupied(player);
    let owns = |row: usize, col: usize| board.get(row, col) == Ok(mark);

    (0..n).any(|row| (0..n).all(|col| owns(row, col)))
        || (0..n).any(|col| (0..n).all(|row| owns(row, col)))
        || (0..n).all(|i| owns(i, i))
        || (0..n).all(|i| owns(i, n - 1 - i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn fill(board: &mut Board, cells: &[(usize, usize)], player: Player) {
        for &(r, c) in cells {
            board.set(r, c, Mark::Occupied(player)).unwrap();
        }
    }

    #[test]
    fn test_no_winner_empty_board() {
        let board = Board::new(3).unwrap();
        for player in Player::iter() {
            assert!(!has_won(&board, player));
        }
    }

    #[test]
    fn test_winner_row() {
        let mut board = Board::new(5).unwrap();
        fill(&mut board, &[(2, 0), (2, 1), (2, 2), (2, 3), (2, 4)], Player::O);
        assert!(has_won(&board, Player::O));
        assert!(!has_won(&board, Player::X));
    }

    #[test]
    fn test_winner_column() {
        let mut board = Board::new(4).unwrap();
        fill(&mut board, &[(0, 3), (1, 3), (2, 3), (3, 3)], Player::X);
        assert!(has_won(&board, Player::X));
    }

    #[test]
    fn test_winner_anti_diagonal() {
        let mut board = Board::new(4).unwrap();
        fill(&mut board, &[(0, 3), (1, 2), (2, 1), (3, 0)], Player::O);
        assert!(has_won(&board, Player::O));
    }

    #[test]
    fn test_winner_main_diagonal_largest_board() {
        let mut board = Board::new(10).unwrap();
        let diagonal: Vec<_> = (0..10).map(|i| (i, i)).collect();
        fill(&mut board, &diagonal, Player::X);
        assert!(has_won(&board, Player::X));
    }

    #[test]
    fn test_no_winner_incomplete_line() {
        let mut board = Board::new(4).unwrap();
        fill(&mut board, &[(0, 0), (0, 1), (0, 2)], Player::X);
        fill(&mut board, &[(0, 3)], Player::O);
        assert!(!has_won(&board, Player::X));
    }

    #[test]
    fn test_three_in_a_row_is_not_enough_on_larger_board() {
        let mut board = Board::new(5).unwrap();
        fill(&mut board, &[(1, 1), (2, 2), (3, 3)], Player::X);
        assert!(!has_won(&board, Player::X));
    }
}
