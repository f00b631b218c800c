//! Crossmark - a tic-tac-toe match engine
//!
//! This library runs best-of-N tic-tac-toe matches between two humans or a
//! human and a probabilistic computer opponent.
//!
//! # Architecture
//!
//! - **Board**: 3x3 grid, placement history and line rules
//! - **Heuristic**: tiered, rate-gated move selection for the computer
//! - **Session**: turn state machine, scoring, pause and end-of-round flow
//! - **Timers**: token-keyed one-shot timers driven by the embedding front end
//!
//! # Example
//!
//! ```
//! use crossmark::{GameConfig, Mark, MatchSession, Mode, Outcome, SequenceSource};
//!
//! let mut session = MatchSession::new(GameConfig::default(), SequenceSource::default());
//! session.start_match(Mode::PlayerVsPlayer { player_one: Mark::X });
//! for index in [0, 3, 1, 4, 2] {
//!     session.apply_move(index).unwrap();
//! }
//! assert_eq!(session.last_result(), Some(Outcome::Winner(Mark::X)));
//! assert_eq!(session.scores().x, 1);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod error;
mod events;
mod heuristic;
mod invariants;
mod phases;
mod position;
mod random;
mod rules;
mod schedule;
mod session;
mod types;

// Crate-level exports - Configuration
pub use config::{AiProfile, GameConfig, Rates};

// Crate-level exports - Errors
pub use error::{ConfigError, MoveError, TransitionError};

// Crate-level exports - Events and timers
pub use events::GameEvent;
pub use schedule::{ScheduledTimer, TimerKind, TimerToken, Timers};

// Crate-level exports - Board and rules
pub use position::Position;
pub use rules::{
    WIN_LINES, WinLine, check_winner, count_threats, find_fork_moves, find_immediate_move,
    find_win_line, is_draw, is_full,
};
pub use types::{Board, Cell, Hypothetical, Mark, Team};

// Crate-level exports - Invariants
pub use invariants::{
    AlternatingMarks, BoardInvariants, HistoryConsistent, Invariant, InvariantSet,
    InvariantViolation, SingleWinner,
};

// Crate-level exports - Computer opponent
pub use heuristic::{Decision, Tier, choose_move, weighted_pick};
pub use random::{RngSource, SequenceSource, UniformSource};

// Crate-level exports - Session
pub use phases::{EndControl, Mode, Outcome, Phase, Scores};
pub use session::{MatchSession, Snapshot};
