//! Fire-and-forget delivery of history events to a store.
//!
//! The game session never waits on persistence. It pushes [`HistoryEvent`]s
//! into an unbounded channel through a [`HistorySink`]; a [`HistoryWriter`]
//! task drains the channel in order and appends to the [`HistoryLog`].
//! Store failures are logged here and go no further.

use super::{HistoryEvent, HistoryLog, SessionId};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Sending half of the history channel, held by a game session.
#[derive(Debug, Clone)]
pub struct HistorySink {
    tx: mpsc::UnboundedSender<HistoryEvent>,
}

impl HistorySink {
    /// Creates a sink together with the receiver that observes its events.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<HistoryEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Creates a sink whose events are discarded.
    pub fn discard() -> Self {
        let (sink, _rx) = Self::channel();
        sink
    }

    /// Emits an event without waiting for it to be stored.
    #[instrument(skip(self, event))]
    pub fn emit(&self, event: HistoryEvent) {
        if self.tx.send(event).is_err() {
            debug!("History channel closed, event dropped");
        }
    }
}

/// Background task appending history events to a store.
#[derive(Debug)]
pub struct HistoryWriter;

impl HistoryWriter {
    /// Spawns the writer task and returns the sink feeding it.
    ///
    /// The task ends once every clone of the returned sink has been dropped
    /// and the remaining events have been written.
    #[instrument(skip(log))]
    pub fn spawn(log: Arc<dyn HistoryLog>) -> (HistorySink, JoinHandle<()>) {
        let (sink, rx) = HistorySink::channel();
        let handle = tokio::spawn(Self::run(log, rx));
        info!("History writer started");
        (sink, handle)
    }

    async fn run(log: Arc<dyn HistoryLog>, mut rx: mpsc::UnboundedReceiver<HistoryEvent>) {
        let mut current: Option<SessionId> = None;

        while let Some(event) = rx.recv().await {
            match event {
                HistoryEvent::SessionStarted {
                    started_at,
                    grid_size,
                } => match log.append_session_record(started_at, grid_size).await {
                    Ok(id) => {
                        debug!(session_id = %id, grid_size, "Session recorded");
                        current = Some(id);
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to record session");
                        current = None;
                    }
                },
                HistoryEvent::MoveApplied(record) => {
                    let session = match current {
                        Some(id) => id,
                        None => {
                            // Moves made before any reset still need a session to live under.
                            match log
                                .append_session_record(Utc::now(), *record.grid_size())
                                .await
                            {
                                Ok(id) => {
                                    debug!(session_id = %id, "Opened session for unkeyed moves");
                                    current = Some(id);
                                    id
                                }
                                Err(e) => {
                                    warn!(error = %e, "Failed to open session, move dropped");
                                    continue;
                                }
                            }
                        }
                    };

                    if let Err(e) = log.append_move_record(session, &record).await {
                        warn!(
                            error = %e,
                            session_id = %session,
                            turn = record.turn_counter(),
                            "Failed to record move"
                        );
                    }
                }
            }
        }

        info!("History writer stopped");
    }
}
