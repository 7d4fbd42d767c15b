//! Command-line interface for xogame.

use clap::{Parser, Subcommand};

/// xogame - N×N tic-tac-toe with recorded history and replay
#[derive(Parser, Debug)]
#[command(name = "xogame")]
#[command(about = "N×N tic-tac-toe with recorded history and replay", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true, default_value = "xogame.toml")]
    pub config: std::path::PathBuf,

    /// Override the history database path
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    /// Keep history in memory only (nothing is written to disk)
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a game in the terminal
    Play {
        /// Grid size of the first game (3-10)
        #[arg(short, long)]
        size: Option<usize>,
    },

    /// List recorded sessions
    Sessions {
        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Replay a recorded game
    Replay {
        /// Session id as shown by `sessions`
        session: i32,

        /// Which game of the session to replay (1 = first)
        #[arg(short, long, default_value = "1")]
        game: usize,

        /// Pause before each move, in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,
    },
}
