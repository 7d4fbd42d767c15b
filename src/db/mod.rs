//! SQLite persistence for session and move history.

mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use repository::SqliteHistory;
