//! Square game board of configurable size.

use crate::{BoardError, Mark};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Smallest supported grid dimension.
pub const MIN_GRID_SIZE: usize = 3;

/// Largest supported grid dimension.
pub const MAX_GRID_SIZE: usize = 10;

/// N×N tic-tac-toe board.
///
/// The board is always square. Cells are stored in row-major order and the
/// only mutation path is [`Board::set`]; changing the size means building a
/// new board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<Mark>,
}

impl Board {
    /// Creates an all-empty board of `size`×`size` cells.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidSize`] if `size` is outside
    /// [`MIN_GRID_SIZE`]..=[`MAX_GRID_SIZE`].
    #[instrument]
    pub fn new(size: usize) -> Result<Self, BoardError> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) {
            return Err(BoardError::InvalidSize { size });
        }
        Ok(Self {
            size,
            cells: vec![Mark::Empty; size * size],
        })
    }

    /// Returns the grid dimension.
    pub fn size(&self) -> usize {
        self.size
    }

    fn index(&self, row: usize, col: usize) -> Result<usize, BoardError> {
        if row >= self.size || col >= self.size {
            return Err(BoardError::OutOfBounds {
                row,
                col,
                size: self.size,
            });
        }
        Ok(row * self.size + col)
    }

    /// Gets the mark at the given cell.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::OutOfBounds`] if the cell is off the board.
    pub fn get(&self, row: usize, col: usize) -> Result<Mark, BoardError> {
        let idx = self.index(row, col)?;
        Ok(self.cells[idx])
    }

    /// Sets the mark at the given cell.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::OutOfBounds`] if the cell is off the board.
    pub fn set(&mut self, row: usize, col: usize, mark: Mark) -> Result<(), BoardError> {
        let idx = self.index(row, col)?;
        self.cells[idx] = mark;
        Ok(())
    }

    /// Checks if a cell is on the board and empty.
    pub fn is_empty_at(&self, row: usize, col: usize) -> bool {
        matches!(self.get(row, col), Ok(Mark::Empty))
    }

    /// Checks if every cell is occupied.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|m| *m != Mark::Empty)
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|m| **m != Mark::Empty).count()
    }

    /// Returns all cells in row-major order.
    pub fn cells(&self) -> &[Mark] {
        &self.cells
    }

    /// Iterates over rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Mark]> {
        self.cells.chunks(self.size)
    }

    /// Formats the board as a human-readable string.
    pub fn display(&self) -> String {
        let separator = vec!["-"; self.size].join("+");
        self.rows()
            .map(|row| {
                row.iter()
                    .map(|m| m.symbol().to_string())
                    .collect::<Vec<_>>()
                    .join("|")
            })
            .collect::<Vec<_>>()
            .join(&format!("\n{}\n", separator))
    }
}
