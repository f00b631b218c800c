//! Error types.
//!
//! Move and transition errors are recoverable rejections: the session
//! refuses the request and leaves its state unchanged.

use crate::position::Position;
use derive_more::{Display, Error};
use tracing::instrument;

/// A cell activation that cannot be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum MoveError {
    /// Index is outside 0-8.
    #[display("Index {} is outside the board", _0)]
    OutOfRange(#[error(not(source))] usize),

    /// The cell already holds a mark.
    #[display("Square {} is already occupied", _0)]
    Occupied(#[error(not(source))] Position),

    /// No round is being played.
    #[display("No active round")]
    NoActiveRound,

    /// The round is paused.
    #[display("Round is paused")]
    Paused,

    /// The round has already ended.
    #[display("Round is already over")]
    RoundOver,

    /// A computer move is pending.
    #[display("Computer is thinking")]
    ComputerThinking,

    /// Human input on the computer's turn.
    #[display("It is not the human player's turn")]
    NotYourTurn,
}

/// A lifecycle request that is not valid in the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum TransitionError {
    /// No match has been started.
    #[display("No active match")]
    NoActiveMatch,

    /// No round is being played.
    #[display("No active round")]
    NoActiveRound,

    /// The round has not finished yet.
    #[display("Round is still in progress")]
    RoundInProgress,

    /// The round has already ended.
    #[display("Round is already over")]
    RoundOver,

    /// A side has reached the win threshold.
    #[display("Match is complete")]
    MatchComplete,

    /// Pause requested while paused.
    #[display("Round is already paused")]
    AlreadyPaused,

    /// Resume requested while not paused.
    #[display("Round is not paused")]
    NotPaused,
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
