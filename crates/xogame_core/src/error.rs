//! Board error types.

use derive_more::{Display, Error};

/// Errors raised at the board boundary.
///
/// Both variants are rejected before any state changes, so a failed call
/// never leaves a board partially modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum BoardError {
    /// Grid dimension outside the supported range.
    #[display("Invalid grid size {size} (must be between 3 and 10)")]
    InvalidSize {
        /// The rejected size.
        size: usize,
    },

    /// Row or column outside the current grid.
    #[display("Cell ({row}, {col}) is outside a {size}x{size} board")]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// Current grid size.
        size: usize,
    },
}
