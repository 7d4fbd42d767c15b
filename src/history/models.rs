//! History records exchanged between the game session and a history store.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use xogame_core::Player;

/// Identifier of a stored game session.
///
/// Allocated by the store when the session record is appended, so ids are
/// unique and increase monotonically within one store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[display("{}", _0)]
pub struct SessionId(pub i32);

/// Marks the start of a game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct SessionRecord {
    id: SessionId,
    started_at: DateTime<Utc>,
    grid_size: usize,
}

/// One successfully applied move.
///
/// `player` is optional because stored entries may lack it; live play
/// always records the mover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct MoveRecord {
    grid_size: usize,
    row: usize,
    col: usize,
    player: Option<Player>,
    turn_counter: u32,
    game_counter: u32,
}

/// Fact emitted by a game session for the history writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEvent {
    /// A new game session began.
    SessionStarted {
        /// When the session started.
        started_at: DateTime<Utc>,
        /// Grid size of the first game.
        grid_size: usize,
    },
    /// A move was placed on the board.
    MoveApplied(MoveRecord),
}

/// Splits a session's moves into one sequence per game.
///
/// Games are returned in ascending `game_counter` order and each game's
/// moves in ascending `turn_counter` order.
pub fn group_games(records: &[MoveRecord]) -> Vec<Vec<MoveRecord>> {
    let mut games: BTreeMap<u32, Vec<MoveRecord>> = BTreeMap::new();
    for record in records {
        games.entry(record.game_counter).or_default().push(*record);
    }
    games
        .into_values()
        .map(|mut moves| {
            moves.sort_by_key(|m| m.turn_counter);
            moves
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_games_splits_and_orders() {
        let records = vec![
            MoveRecord::new(4, 0, 0, Some(Player::X), 1, 3),
            MoveRecord::new(3, 1, 1, Some(Player::O), 2, 2),
            MoveRecord::new(3, 0, 0, Some(Player::X), 1, 2),
            MoveRecord::new(4, 1, 0, Some(Player::O), 2, 3),
        ];

        let games = group_games(&records);
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].iter().map(|m| *m.game_counter()).collect::<Vec<_>>(), vec![2, 2]);
        assert_eq!(games[0].iter().map(|m| *m.turn_counter()).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(*games[1][0].grid_size(), 4);
    }

    #[test]
    fn test_group_games_empty() {
        assert!(group_games(&[]).is_empty());
    }
}
