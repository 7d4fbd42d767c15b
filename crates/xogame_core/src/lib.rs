//! Pure game logic for N×N tic-tac-toe.
//!
//! The board is a square grid between [`MIN_GRID_SIZE`] and [`MAX_GRID_SIZE`]
//! cells wide. A player wins by filling an entire row, column, or one of the
//! two main diagonals. Nothing in this crate performs I/O.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod error;
pub mod rules;
mod types;

pub use board::{Board, MAX_GRID_SIZE, MIN_GRID_SIZE};
pub use error::BoardError;
pub use rules::evaluate;
pub use types::{GameStatus, Mark, Player};
