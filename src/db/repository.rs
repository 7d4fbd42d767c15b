//! SQLite-backed history store.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use super::models::{MoveRow, NewMoveRow, NewSessionRow, SessionRow};
use super::schema;
use crate::history::{
    HistoryError, HistoryErrorKind, HistoryLog, MoveRecord, SessionId, SessionRecord,
};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// History store persisted to a SQLite database file.
///
/// Every operation opens its own connection, so the store is cheap to clone
/// and safe to move into blocking tasks.
#[derive(Debug, Clone)]
pub struct SqliteHistory {
    db_path: String,
}

impl SqliteHistory {
    /// Opens the database at `db_path`, creating the schema if needed.
    ///
    /// Use `":memory:"` only for single-connection experiments: each call
    /// opens a fresh connection, so an in-memory database does not persist
    /// between operations.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path))]
    pub fn open(db_path: impl Into<String>) -> Result<Self, HistoryError> {
        let store = Self {
            db_path: db_path.into(),
        };
        info!(path = %store.db_path, "Opening history database");

        let mut conn = store.connection()?;
        let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            HistoryError::new(HistoryErrorKind::Store, format!("Migrations failed: {}", e))
        })?;
        debug!(count = applied.len(), "Migrations applied");

        Ok(store)
    }

    /// Path of the underlying database file.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, HistoryError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path).map_err(|e| {
            HistoryError::new(
                HistoryErrorKind::Store,
                format!("Failed to connect to '{}': {}", self.db_path, e),
            )
        })
    }

    /// Inserts a session row and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn insert_session(
        &self,
        started_at: DateTime<Utc>,
        grid_size: usize,
    ) -> Result<SessionId, HistoryError> {
        let mut conn = self.connection()?;
        let row = NewSessionRow::from_start(started_at, grid_size)?;

        let session = diesel::insert_into(schema::sessions::table)
            .values(&row)
            .returning(SessionRow::as_returning())
            .get_result::<SessionRow>(&mut conn)?
            .into_record()?;

        info!(session_id = %session.id(), grid_size, "Session recorded");
        Ok(*session.id())
    }

    /// Inserts a move row under `session`.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] if a database error occurs.
    #[instrument(skip(self, record), fields(session_id = %session, turn = record.turn_counter()))]
    pub fn insert_move(&self, session: SessionId, record: &MoveRecord) -> Result<(), HistoryError> {
        let mut conn = self.connection()?;
        let row = NewMoveRow::from_record(session, record)?;

        diesel::insert_into(schema::moves::table)
            .values(&row)
            .execute(&mut conn)?;

        debug!("Move recorded");
        Ok(())
    }

    /// Loads all sessions, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] if a database error occurs or a row is corrupt.
    #[instrument(skip(self))]
    pub fn sessions(&self) -> Result<Vec<SessionRecord>, HistoryError> {
        let mut conn = self.connection()?;

        let rows = schema::sessions::table
            .order((schema::sessions::started_at.asc(), schema::sessions::id.asc()))
            .select(SessionRow::as_select())
            .load::<SessionRow>(&mut conn)?;

        info!(count = rows.len(), "Sessions loaded");
        rows.into_iter().map(SessionRow::into_record).collect()
    }

    /// Loads the moves of `session`, sorted by game then turn.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] if a database error occurs or a row is corrupt.
    #[instrument(skip(self))]
    pub fn moves(&self, session: SessionId) -> Result<Vec<MoveRecord>, HistoryError> {
        let mut conn = self.connection()?;

        let rows = schema::moves::table
            .filter(schema::moves::session_id.eq(session.0))
            .order((
                schema::moves::game_counter.asc(),
                schema::moves::turn_counter.asc(),
            ))
            .select(MoveRow::as_select())
            .load::<MoveRow>(&mut conn)?;

        info!(session_id = %session, count = rows.len(), "Moves loaded");
        rows.into_iter().map(MoveRow::into_record).collect()
    }
}

#[async_trait::async_trait]
impl HistoryLog for SqliteHistory {
    async fn append_session_record(
        &self,
        started_at: DateTime<Utc>,
        grid_size: usize,
    ) -> Result<SessionId, HistoryError> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.insert_session(started_at, grid_size)).await?
    }

    async fn append_move_record(
        &self,
        session: SessionId,
        record: &MoveRecord,
    ) -> Result<(), HistoryError> {
        let store = self.clone();
        let record = *record;
        tokio::task::spawn_blocking(move || store.insert_move(session, &record)).await?
    }

    async fn list_session_records(&self) -> Result<Vec<SessionRecord>, HistoryError> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.sessions()).await?
    }

    async fn list_move_records(&self, session: SessionId) -> Result<Vec<MoveRecord>, HistoryError> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.moves(session)).await?
    }
}
