//! Named events emitted on state transitions.
//!
//! Collaborators (audio, score animation, text front ends) drain these from
//! the session and decide what to do with them.

use crate::heuristic::Tier;
use crate::phases::Mode;
use crate::position::Position;
use crate::types::Mark;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Something that happened inside the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, strum::IntoStaticStr)]
#[serde(tag = "event", rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GameEvent {
    /// A match began.
    MatchStarted {
        /// Mode and side assignment.
        mode: Mode,
    },
    /// A mark was placed.
    MovePlaced {
        /// Placed mark.
        mark: Mark,
        /// Cell it was placed in.
        position: Position,
        /// Heuristic tier, for computer moves.
        tier: Option<Tier>,
    },
    /// The turn passed to `mark`.
    TurnChanged {
        /// Mark to move.
        mark: Mark,
    },
    /// The computer started thinking.
    ComputerThinking {
        /// Delay before the move lands.
        delay: Duration,
    },
    /// A round ended with a winner (any winner in two-player mode, the human
    /// in computer mode).
    RoundWon {
        /// Winning mark.
        winner: Mark,
    },
    /// The computer won a round.
    RoundLost {
        /// Winning mark.
        winner: Mark,
    },
    /// A round ended in a draw.
    RoundDraw,
    /// One point was added to `mark`'s score.
    ScoreAwarded {
        /// Scoring mark.
        mark: Mark,
        /// Score after the award.
        score: u32,
    },
    /// A score reached the win threshold.
    MatchComplete {
        /// Match winner.
        winner: Mark,
    },
    /// The round was paused.
    Paused,
    /// The round was resumed.
    Resumed,
    /// End-of-round controls accept input.
    EndControlsArmed,
    /// The session went back to the main menu.
    ReturnedToMenu,
}

impl GameEvent {
    /// Kebab-case event name, e.g. `move-placed`.
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_kebab_case() {
        let placed = GameEvent::MovePlaced {
            mark: Mark::X,
            position: Position::Center,
            tier: None,
        };
        assert_eq!(placed.name(), "move-placed");
        assert_eq!(GameEvent::RoundDraw.name(), "round-draw");
        assert_eq!(GameEvent::RoundLost { winner: Mark::O }.name(), "round-lost");
    }

    #[test]
    fn test_json_tag_matches_name() {
        let event = GameEvent::ScoreAwarded {
            mark: Mark::O,
            score: 2,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "score-awarded");
        assert_eq!(json["score"], 2);
    }
}
