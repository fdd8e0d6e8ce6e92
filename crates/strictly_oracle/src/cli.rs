//! Command-line interface for strictly_oracle.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use strictly_board::Player;
use strictly_oracle::SourceKind;

/// Strictly Oracle - tic-tac-toe against an external move oracle
#[derive(Parser, Debug)]
#[command(name = "strictly_oracle")]
#[command(about = "Play tic-tac-toe against an LLM or remote move oracle", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Side selection on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Side {
    /// X, moves first
    X,
    /// O, moves second
    O,
}

impl From<Side> for Player {
    fn from(side: Side) -> Self {
        match side {
            Side::X => Player::X,
            Side::O => Player::O,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play against the oracle in the terminal
    Play {
        /// Path to oracle configuration file
        #[arg(short, long, default_value = "oracle.toml")]
        config: PathBuf,

        /// Override the configured decision source
        #[arg(long, value_enum)]
        source: Option<SourceKind>,

        /// Side the human plays
        #[arg(long, value_enum, default_value = "x")]
        human: Side,
    },

    /// Watch the oracle (O) play a simple local opponent (X)
    Watch {
        /// Path to oracle configuration file
        #[arg(short, long, default_value = "oracle.toml")]
        config: PathBuf,

        /// Override the configured decision source
        #[arg(long, value_enum)]
        source: Option<SourceKind>,

        /// Number of games to play
        #[arg(short, long, default_value = "3")]
        games: u32,
    },
}
