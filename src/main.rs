//! xogame - terminal front end
//!
//! Play N×N tic-tac-toe, list recorded sessions, and replay recorded games.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use xogame::{
    AppConfig, GameController, GameSession, HistoryLog, HistorySink, HistoryWriter,
    MemoryHistory, ReplayEngine, SessionId, SqliteHistory, group_games, run_play, run_replay,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing();

    let config = AppConfig::load(&cli.config)?.with_overrides(cli.db_path.clone(), None, None)?;
    let store = open_store(&config, cli.ephemeral)?;

    match cli.command {
        Command::Play { size } => {
            let config = config.with_overrides(None, None, size)?;
            run_play_command(config, store).await
        }
        Command::Sessions { json } => run_sessions_command(store, json).await,
        Command::Replay {
            session,
            game,
            interval_ms,
        } => {
            let config = config.with_overrides(None, interval_ms, None)?;
            run_replay_command(config, store, SessionId(session), game).await
        }
    }
}

#[instrument]
fn initialize_tracing() {
    // Logs go to stderr so they never interleave with the board on stdout.
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,xogame=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!("Tracing initialized");
}

#[instrument(skip(config), fields(db_path = %config.db_path()))]
fn open_store(config: &AppConfig, ephemeral: bool) -> Result<Arc<dyn HistoryLog>> {
    if ephemeral {
        info!("Using in-memory history");
        return Ok(Arc::new(MemoryHistory::new()));
    }

    let store = SqliteHistory::open(config.db_path().clone())
        .with_context(|| format!("Failed to open history database {}", config.db_path()))?;
    Ok(Arc::new(store))
}

/// Interactive play with every move recorded in the background.
#[instrument(skip_all)]
async fn run_play_command(config: AppConfig, store: Arc<dyn HistoryLog>) -> Result<()> {
    let (sink, writer) = HistoryWriter::spawn(store);
    let session = GameSession::new(*config.initial_grid_size(), sink)?.into_shared();
    let mut controller = GameController::new(session, ReplayEngine::new(config.replay_interval()));

    run_play(&mut controller).await?;

    // Dropping the last sink lets the writer drain and exit.
    drop(controller);
    writer.await.context("History writer task failed")?;

    info!("Goodbye");
    Ok(())
}

#[instrument(skip(store))]
async fn run_sessions_command(store: Arc<dyn HistoryLog>, json: bool) -> Result<()> {
    let sessions = store.list_session_records().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!("No recorded sessions");
        return Ok(());
    }

    println!("{:>6}  {:<25}  {:>4}  {:>5}  {:>5}", "ID", "STARTED", "SIZE", "GAMES", "MOVES");
    for record in &sessions {
        let moves = store.list_move_records(*record.id()).await?;
        println!(
            "{:>6}  {:<25}  {:>4}  {:>5}  {:>5}",
            record.id(),
            record.started_at().format("%Y-%m-%d %H:%M:%S UTC"),
            record.grid_size(),
            group_games(&moves).len(),
            moves.len()
        );
    }
    Ok(())
}

#[instrument(skip(config, store))]
async fn run_replay_command(
    config: AppConfig,
    store: Arc<dyn HistoryLog>,
    session_id: SessionId,
    game: usize,
) -> Result<()> {
    let moves = store.list_move_records(session_id).await?;
    if moves.is_empty() {
        bail!("Session {} has no recorded moves", session_id);
    }

    let games = group_games(&moves);
    let Some(records) = game.checked_sub(1).and_then(|i| games.get(i)) else {
        bail!(
            "Session {} has {} game(s), cannot replay game {}",
            session_id,
            games.len(),
            game
        );
    };
    info!(session_id = %session_id, game, moves = records.len(), "Replaying game");

    // Replayed moves are never recorded, so the session needs no writer.
    let session = GameSession::new(*config.initial_grid_size(), HistorySink::discard())?.into_shared();
    let mut controller = GameController::new(session, ReplayEngine::new(config.replay_interval()));

    match run_replay(&mut controller, records.clone()).await? {
        Some(report) if report.cancelled => {
            println!("Replay stopped after {} move(s)", report.applied)
        }
        Some(report) => println!(
            "Replay finished: {} move(s) applied, {} ignored",
            report.applied, report.ignored
        ),
        None => println!("Replay ended"),
    }
    Ok(())
}
