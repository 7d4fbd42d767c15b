//! Database rows and their mapping to history records.

use chrono::{DateTime, NaiveDateTime, Utc};
use derive_new::new;
use diesel::prelude::*;
use tracing::{instrument, warn};
use xogame_core::Player;

use super::schema;
use crate::history::{HistoryError, MoveRecord, SessionId, SessionRecord};

/// Session row.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = schema::sessions)]
pub struct SessionRow {
    id: i32,
    started_at: NaiveDateTime,
    grid_size: i32,
}

impl SessionRow {
    /// Converts the row into a [`SessionRecord`].
    #[instrument(skip(self), fields(id = self.id))]
    pub fn into_record(self) -> Result<SessionRecord, HistoryError> {
        Ok(SessionRecord::new(
            SessionId(self.id),
            self.started_at.and_utc(),
            to_usize("grid_size", self.grid_size)?,
        ))
    }
}

/// Insertable session row.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::sessions)]
pub struct NewSessionRow {
    started_at: NaiveDateTime,
    grid_size: i32,
}

impl NewSessionRow {
    /// Builds a row from a session start.
    #[instrument]
    pub fn from_start(started_at: DateTime<Utc>, grid_size: usize) -> Result<Self, HistoryError> {
        Ok(Self::new(started_at.naive_utc(), to_i32("grid_size", grid_size)?))
    }
}

/// Move row.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable)]
#[diesel(table_name = schema::moves)]
#[diesel(belongs_to(SessionRow, foreign_key = session_id))]
pub struct MoveRow {
    id: i32,
    session_id: i32,
    grid_size: i32,
    row_index: i32,
    col_index: i32,
    player: Option<String>,
    turn_counter: i32,
    game_counter: i32,
}

impl MoveRow {
    /// Converts the row into a [`MoveRecord`].
    ///
    /// A missing or unrecognised player is kept as `None`.
    #[instrument(skip(self), fields(id = self.id, session_id = self.session_id))]
    pub fn into_record(self) -> Result<MoveRecord, HistoryError> {
        let player = match self.player.as_deref() {
            None => None,
            Some(label) => match label.trim().parse::<Player>() {
                Ok(player) => Some(player),
                Err(_) => {
                    warn!(label, "Unrecognised player in stored move");
                    None
                }
            },
        };

        Ok(MoveRecord::new(
            to_usize("grid_size", self.grid_size)?,
            to_usize("row", self.row_index)?,
            to_usize("col", self.col_index)?,
            player,
            to_u32("turn_counter", self.turn_counter)?,
            to_u32("game_counter", self.game_counter)?,
        ))
    }
}

/// Insertable move row.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::moves)]
pub struct NewMoveRow {
    session_id: i32,
    grid_size: i32,
    row_index: i32,
    col_index: i32,
    player: Option<String>,
    turn_counter: i32,
    game_counter: i32,
}

impl NewMoveRow {
    /// Builds a row for `record` under `session`.
    #[instrument(skip(record))]
    pub fn from_record(session: SessionId, record: &MoveRecord) -> Result<Self, HistoryError> {
        Ok(Self::new(
            session.0,
            to_i32("grid_size", *record.grid_size())?,
            to_i32("row", *record.row())?,
            to_i32("col", *record.col())?,
            record.player().map(|p| p.to_string()),
            to_i32("turn_counter", *record.turn_counter())?,
            to_i32("game_counter", *record.game_counter())?,
        ))
    }
}

fn to_usize(field: &str, value: i32) -> Result<usize, HistoryError> {
    usize::try_from(value)
        .map_err(|_| HistoryError::corrupt(format!("Negative {}: {}", field, value)))
}

fn to_u32(field: &str, value: i32) -> Result<u32, HistoryError> {
    u32::try_from(value)
        .map_err(|_| HistoryError::corrupt(format!("Negative {}: {}", field, value)))
}

fn to_i32<T>(field: &str, value: T) -> Result<i32, HistoryError>
where
    T: TryInto<i32> + Copy + std::fmt::Display,
{
    value
        .try_into()
        .map_err(|_| HistoryError::corrupt(format!("{} out of range: {}", field, value)))
}
