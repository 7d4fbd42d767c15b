//! In-process history store.

use super::{HistoryError, HistoryLog, MoveRecord, SessionId, SessionRecord};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, instrument};

#[derive(Debug, Default)]
struct Inner {
    sessions: Vec<SessionRecord>,
    moves: Vec<(SessionId, MoveRecord)>,
}

/// History kept in memory for the lifetime of the process.
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryHistory {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored move records across all sessions.
    pub fn move_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .moves
            .len()
    }
}

#[async_trait::async_trait]
impl HistoryLog for MemoryHistory {
    #[instrument(skip(self))]
    async fn append_session_record(
        &self,
        started_at: DateTime<Utc>,
        grid_size: usize,
    ) -> Result<SessionId, HistoryError> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let id = SessionId(inner.sessions.len() as i32 + 1);
        inner
            .sessions
            .push(SessionRecord::new(id, started_at, grid_size));
        debug!(session_id = %id, "Session appended");
        Ok(id)
    }

    #[instrument(skip(self, record), fields(session_id = %session, turn = record.turn_counter()))]
    async fn append_move_record(
        &self,
        session: SessionId,
        record: &MoveRecord,
    ) -> Result<(), HistoryError> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.moves.push((session, *record));
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_session_records(&self) -> Result<Vec<SessionRecord>, HistoryError> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let mut sessions = inner.sessions.clone();
        sessions.sort_by_key(|s| (*s.started_at(), *s.id()));
        Ok(sessions)
    }

    #[instrument(skip(self))]
    async fn list_move_records(&self, session: SessionId) -> Result<Vec<MoveRecord>, HistoryError> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let mut moves: Vec<MoveRecord> = inner
            .moves
            .iter()
            .filter(|(id, _)| *id == session)
            .map(|(_, record)| *record)
            .collect();
        moves.sort_by_key(|m| (*m.game_counter(), *m.turn_counter()));
        debug!(count = moves.len(), "Moves loaded");
        Ok(moves)
    }
}
