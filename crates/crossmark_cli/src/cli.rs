//! Command-line interface for crossmark.

use clap::{Parser, Subcommand, ValueEnum};
use crossmark::{Mark, Mode, Team};
use std::path::PathBuf;

/// Crossmark - tic-tac-toe matches in the terminal
#[derive(Parser, Debug)]
#[command(name = "crossmark")]
#[command(about = "Best-of-N tic-tac-toe against a friend or the computer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a match on stdin/stdout
    Play {
        /// Who plays
        #[arg(short, long, value_enum, default_value_t = ModeArg::Pvc)]
        mode: ModeArg,

        /// Team for the human (pvc) or player 1 (pvp)
        #[arg(short, long, value_enum, default_value_t = SideArg::Red)]
        side: SideArg,

        /// Path to a TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Seed for the computer's random choices
        #[arg(long)]
        seed: Option<u64>,

        /// Print events as JSON lines instead of text
        #[arg(long)]
        json_events: bool,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Path to a TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Match mode
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Two humans on one terminal
    Pvp,
    /// Human against the computer
    Pvc,
}

/// Team selection
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideArg {
    /// Red team (X)
    Red,
    /// Blue team (O)
    Blue,
}

impl SideArg {
    /// Mark played by the chosen team.
    pub fn mark(self) -> Mark {
        match self {
            SideArg::Red => Team::Red.mark(),
            SideArg::Blue => Team::Blue.mark(),
        }
    }
}

impl ModeArg {
    /// Builds the session mode for `side`.
    pub fn with_side(self, side: SideArg) -> Mode {
        match self {
            ModeArg::Pvp => Mode::PlayerVsPlayer {
                player_one: side.mark(),
            },
            ModeArg::Pvc => Mode::PlayerVsComputer { human: side.mark() },
        }
    }
}
