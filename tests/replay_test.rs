//! Tests for paced replay of recorded games.
//!
//! All tests run on a paused clock, so replay pauses cost no wall time.

use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use xogame::{
    GameSession, GameStatus, HistoryEvent, HistorySink, IgnoreReason, Mark, Mode, MoveOutcome, MoveRecord,
    Player, ReplayEngine, ReplayError, SharedSession,
};

const INTERVAL: Duration = Duration::from_millis(1000);

fn record(row: usize, col: usize, player: Option<Player>, turn: u32) -> MoveRecord {
    MoveRecord::new(3, row, col, player, turn, 1)
}

/// X wins on the main diagonal.
fn diagonal_game() -> Vec<MoveRecord> {
    vec![
        record(0, 0, Some(Player::X), 1),
        record(1, 0, Some(Player::O), 2),
        record(1, 1, Some(Player::X), 3),
        record(2, 0, Some(Player::O), 4),
        record(2, 2, Some(Player::X), 5),
    ]
}

fn recording_session() -> (SharedSession, UnboundedReceiver<HistoryEvent>) {
    let (sink, rx) = HistorySink::channel();
    (GameSession::new(3, sink).unwrap().into_shared(), rx)
}

#[tokio::test(start_paused = true)]
async fn test_replay_reaches_recorded_result() {
    let (session, mut events) = recording_session();
    let engine = ReplayEngine::new(INTERVAL);

    let handle = engine.start(diagonal_game(), session.clone()).await.unwrap();
    let report = handle.finished().await.unwrap();

    assert_eq!(report.applied, 5);
    assert_eq!(report.ignored, 0);
    assert!(!report.cancelled);

    let guard = session.lock().await;
    assert_eq!(guard.status(), GameStatus::Won(Player::X));
    assert_eq!(guard.turn_counter(), 5);
    assert_eq!(guard.mode(), Mode::Interactive);
    assert!(events.try_recv().is_err(), "replay must not write history");
}

#[tokio::test(start_paused = true)]
async fn test_replay_sorts_records_by_turn() {
    let (session, _events) = recording_session();
    let mut records = diagonal_game();
    records.reverse();

    let handle = ReplayEngine::new(INTERVAL)
        .start(records, session.clone())
        .await
        .unwrap();
    let report = handle.finished().await.unwrap();

    assert_eq!(report.applied, 5);
    assert_eq!(session.lock().await.status(), GameStatus::Won(Player::X));
}

#[tokio::test(start_paused = true)]
async fn test_replay_is_paced() {
    let (session, _events) = recording_session();
    let started = tokio::time::Instant::now();

    let handle = ReplayEngine::new(INTERVAL)
        .start(diagonal_game(), session)
        .await
        .unwrap();
    handle.finished().await.unwrap();

    let elapsed = started.elapsed();
    assert!(elapsed >= INTERVAL * 5, "finished too early: {elapsed:?}");
    assert!(elapsed < INTERVAL * 6, "finished too late: {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn test_stop_cancels_remaining_moves() {
    let (session, _events) = recording_session();
    let handle = ReplayEngine::new(INTERVAL)
        .start(diagonal_game(), session.clone())
        .await
        .unwrap();

    tokio::time::sleep(INTERVAL * 2 + INTERVAL / 2).await;
    handle.stop();
    let report = handle.finished().await.unwrap();

    assert!(report.cancelled);
    assert_eq!(report.applied, 2);

    let guard = session.lock().await;
    assert_eq!(guard.turn_counter(), 2);
    assert_eq!(guard.status(), GameStatus::Ongoing);
    assert_eq!(guard.mode(), Mode::Interactive);
}

#[tokio::test(start_paused = true)]
async fn test_direct_moves_refused_while_replaying() {
    let (session, _events) = recording_session();
    let handle = ReplayEngine::new(INTERVAL)
        .start(diagonal_game(), session.clone())
        .await
        .unwrap();

    assert_eq!(
        session.lock().await.tap(2, 1),
        MoveOutcome::Ignored(IgnoreReason::ReplayActive)
    );

    handle.finished().await.unwrap();
    assert_eq!(
        session.lock().await.tap(0, 2),
        MoveOutcome::Ignored(IgnoreReason::GameOver)
    );
}

#[tokio::test(start_paused = true)]
async fn test_second_replay_is_rejected() {
    let (session, _events) = recording_session();
    let engine = ReplayEngine::new(INTERVAL);

    let first = engine.start(diagonal_game(), session.clone()).await.unwrap();
    let second = engine.start(diagonal_game(), session.clone()).await;
    assert!(matches!(second, Err(ReplayError::AlreadyReplaying)));

    let report = first.finished().await.unwrap();
    assert_eq!(report.applied, 5);
}

#[tokio::test(start_paused = true)]
async fn test_missing_player_defaults_to_x() {
    let (session, _events) = recording_session();
    let records = vec![record(1, 1, None, 1), record(0, 0, Some(Player::O), 2)];

    let handle = ReplayEngine::new(INTERVAL)
        .start(records, session.clone())
        .await
        .unwrap();
    handle.finished().await.unwrap();

    let guard = session.lock().await;
    assert_eq!(guard.board().get(1, 1), Ok(Mark::Occupied(Player::X)));
    assert_eq!(guard.board().get(0, 0), Ok(Mark::Occupied(Player::O)));
}

#[tokio::test(start_paused = true)]
async fn test_replay_uses_recorded_grid_size() {
    let (session, _events) = recording_session();
    let records = vec![MoveRecord::new(5, 4, 4, Some(Player::X), 1, 3)];

    let handle = ReplayEngine::new(INTERVAL)
        .start(records, session.clone())
        .await
        .unwrap();
    handle.finished().await.unwrap();

    let guard = session.lock().await;
    assert_eq!(guard.grid_size(), 5);
    assert_eq!(guard.board().get(4, 4), Ok(Mark::Occupied(Player::X)));
}

#[tokio::test(start_paused = true)]
async fn test_unsupported_recorded_size_is_rejected() {
    let (session, _events) = recording_session();
    let records = vec![MoveRecord::new(12, 0, 0, Some(Player::X), 1, 1)];

    let result = ReplayEngine::new(INTERVAL).start(records, session.clone()).await;
    assert!(matches!(result, Err(ReplayError::InvalidSize(_))));

    let guard = session.lock().await;
    assert_eq!(guard.mode(), Mode::Interactive);
    assert_eq!(guard.grid_size(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_conflicting_records_are_skipped() {
    let (session, _events) = recording_session();
    let records = vec![
        record(0, 0, Some(Player::X), 1),
        record(0, 0, Some(Player::O), 2),
        record(9, 9, Some(Player::O), 3),
    ];

    let handle = ReplayEngine::new(INTERVAL)
        .start(records, session.clone())
        .await
        .unwrap();
    let report = handle.finished().await.unwrap();

    assert_eq!(report.applied, 1);
    assert_eq!(report.ignored, 2);
    assert_eq!(session.lock().await.turn_counter(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_replay_of_live_records_reproduces_game() {
    let (sink, mut events) = HistorySink::channel();
    let mut live = GameSession::new(4, sink).unwrap();
    for (row, col) in [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2), (1, 2), (0, 3)] {
        assert!(live.tap(row, col).is_applied());
    }
    assert_eq!(live.status(), GameStatus::Won(Player::X));

    let mut records = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let HistoryEvent::MoveApplied(record) = event {
            records.push(record);
        }
    }
    assert_eq!(records.len(), 7);

    let replayed = GameSession::new(4, HistorySink::discard()).unwrap().into_shared();
    let handle = ReplayEngine::new(INTERVAL)
        .start(records, replayed.clone())
        .await
        .unwrap();
    let report = handle.finished().await.unwrap();
    assert_eq!(report.applied, 7);

    let guard = replayed.lock().await;
    assert_eq!(guard.board(), live.board());
    assert_eq!(guard.status(), live.status());
    assert_eq!(guard.turn_counter(), live.turn_counter());
}

#[tokio::test(start_paused = true)]
async fn test_reset_retires_running_replay() {
    let (session, _events) = recording_session();
    let engine = ReplayEngine::new(INTERVAL);

    let first = engine
        .start(
            vec![record(0, 0, Some(Player::X), 1), record(0, 1, Some(Player::O), 2)],
            session.clone(),
        )
        .await
        .unwrap();
    session.lock().await.reset(3).unwrap();
    let second = engine
        .start(
            vec![
                record(2, 2, Some(Player::X), 1),
                record(2, 1, Some(Player::O), 2),
                record(1, 0, Some(Player::X), 3),
                record(0, 2, Some(Player::O), 4),
            ],
            session.clone(),
        )
        .await
        .unwrap();

    let retired = first.finished().await.unwrap();
    assert!(retired.cancelled);
    assert_eq!(retired.applied, 0);
    {
        let guard = session.lock().await;
        assert_eq!(guard.mode(), Mode::Replaying, "retired replay must not end the new one");
        assert_eq!(guard.board().get(0, 0), Ok(Mark::Empty));
    }

    let report = second.finished().await.unwrap();
    assert_eq!(report.applied, 4);
    assert_eq!(report.ignored, 0);

    let guard = session.lock().await;
    assert_eq!(guard.mode(), Mode::Interactive);
    assert_eq!(guard.board().occupied_count(), 4);
    assert_eq!(guard.board().get(0, 0), Ok(Mark::Empty));
    assert_eq!(guard.board().get(0, 2), Ok(Mark::Occupied(Player::O)));
}

#[tokio::test(start_paused = true)]
async fn test_records_from_several_games_are_rejected() {
    let (session, _events) = recording_session();
    let records = vec![
        MoveRecord::new(3, 0, 0, Some(Player::X), 1, 1),
        MoveRecord::new(4, 0, 0, Some(Player::X), 1, 2),
    ];

    let result = ReplayEngine::new(INTERVAL).start(records, session.clone()).await;
    assert!(matches!(result, Err(ReplayError::MixedGames { games: 2 })));
    assert_eq!(session.lock().await.mode(), Mode::Interactive);
}
