//! Storage interface for session and move history.

use super::{HistoryError, MoveRecord, SessionId, SessionRecord};
use chrono::{DateTime, Utc};

/// Durable store of session and move records.
///
/// Records are append-only. Writers never read back what they appended;
/// readers are the history listing and the replay path.
#[async_trait::async_trait]
pub trait HistoryLog: Send + Sync {
    /// Appends a session record and returns the id allocated for it.
    async fn append_session_record(
        &self,
        started_at: DateTime<Utc>,
        grid_size: usize,
    ) -> Result<SessionId, HistoryError>;

    /// Appends a move record to an existing session.
    async fn append_move_record(
        &self,
        session: SessionId,
        record: &MoveRecord,
    ) -> Result<(), HistoryError>;

    /// Lists all session records, oldest first.
    async fn list_session_records(&self) -> Result<Vec<SessionRecord>, HistoryError>;

    /// Lists the moves of one session, sorted by game then turn.
    ///
    /// An unknown session yields an empty list.
    async fn list_move_records(&self, session: SessionId) -> Result<Vec<MoveRecord>, HistoryError>;
}
