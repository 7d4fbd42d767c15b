//! History error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// Broad category of a [`HistoryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum HistoryErrorKind {
    /// The store rejected or could not perform the operation.
    Store,
    /// A blocking store task panicked or was cancelled.
    Task,
    /// A stored value could not be mapped back into a record.
    Corrupt,
}

/// Failure reading from or writing to a history store, with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("History {kind} error: {message} at {file}:{line}")]
pub struct HistoryError {
    /// Error category.
    pub kind: HistoryErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl HistoryError {
    /// Creates a new history error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: HistoryErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Shorthand for a [`HistoryErrorKind::Corrupt`] error.
    #[track_caller]
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::new(HistoryErrorKind::Corrupt, message)
    }
}

impl From<diesel::result::Error> for HistoryError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(HistoryErrorKind::Store, format!("Diesel error: {}", err))
    }
}

impl From<diesel::ConnectionError> for HistoryError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(HistoryErrorKind::Store, format!("Connection error: {}", err))
    }
}

impl From<tokio::task::JoinError> for HistoryError {
    #[track_caller]
    fn from(err: tokio::task::JoinError) -> Self {
        Self::new(HistoryErrorKind::Task, format!("Blocking task failed: {}", err))
    }
}
