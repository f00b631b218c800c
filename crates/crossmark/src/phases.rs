//! Match-level value types: mode, phase, outcome and scores.

use crate::types::Mark;
use serde::{Deserialize, Serialize};

/// Who plays, and which mark each side controls.
///
/// Chosen once at side selection and fixed for the whole match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum Mode {
    /// Two humans sharing the board.
    PlayerVsPlayer {
        /// Mark controlled by player 1.
        player_one: Mark,
    },
    /// One human against the heuristic opponent.
    PlayerVsComputer {
        /// Mark controlled by the human.
        human: Mark,
    },
}

impl Mode {
    /// The computer's mark, in computer mode.
    pub fn computer(&self) -> Option<Mark> {
        match self {
            Mode::PlayerVsPlayer { .. } => None,
            Mode::PlayerVsComputer { human } => Some(human.opponent()),
        }
    }

    /// Returns true if `mark` is played by the computer.
    pub fn is_computer(&self, mark: Mark) -> bool {
        self.computer() == Some(mark)
    }
}

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Phase {
    /// Main menu; no round.
    Idle,
    /// A round is being played.
    InRound,
    /// A round is paused.
    Paused,
    /// The round ended and another may follow.
    RoundOver,
    /// A side reached the win threshold.
    MatchOver,
}

/// Outcome of a finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Mark that completed a line.
    Winner(Mark),
    /// Board filled without a line.
    Draw,
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Mark> {
        match self {
            Outcome::Winner(mark) => Some(*mark),
            Outcome::Draw => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(mark) => write!(f, "{} WINS!", mark.team()),
            Outcome::Draw => write!(f, "DRAW!"),
        }
    }
}

/// Round wins per mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Scores {
    /// Red team (`X`) score.
    pub x: u32,
    /// Blue team (`O`) score.
    pub o: u32,
}

impl Scores {
    /// Score for `mark`.
    pub fn get(&self, mark: Mark) -> u32 {
        match mark {
            Mark::X => self.x,
            Mark::O => self.o,
        }
    }

    /// Adds one point to `mark` and returns the new score.
    pub(crate) fn award(&mut self, mark: Mark) -> u32 {
        let score = match mark {
            Mark::X => &mut self.x,
            Mark::O => &mut self.o,
        };
        *score += 1;
        *score
    }

    /// The mark whose score reached `threshold`, if any.
    pub fn leader_at(&self, threshold: u32) -> Option<Mark> {
        [Mark::X, Mark::O]
            .into_iter()
            .find(|&m| self.get(m) >= threshold)
    }
}

/// Controls on the end-of-round overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndControl {
    /// Start the next round.
    PlayAgain,
    /// Return to the main menu.
    MainMenu,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_computer_mark_is_human_opponent() {
        let mode = Mode::PlayerVsComputer { human: Mark::O };
        assert_eq!(mode.computer(), Some(Mark::X));
        assert!(mode.is_computer(Mark::X));
        assert_eq!(Mode::PlayerVsPlayer { player_one: Mark::X }.computer(), None);
    }

    #[test]
    fn test_scores_award_and_threshold() {
        let mut scores = Scores::default();
        assert_eq!(scores.award(Mark::O), 1);
        assert_eq!(scores.award(Mark::O), 2);
        assert_eq!(scores.leader_at(3), None);
        assert_eq!(scores.award(Mark::O), 3);
        assert_eq!(scores.leader_at(3), Some(Mark::O));
        assert_eq!(scores.get(Mark::X), 0);
    }

    #[test]
    fn test_outcome_display_uses_team() {
        assert_eq!(Outcome::Winner(Mark::X).to_string(), "RED WINS!");
        assert_eq!(Outcome::Draw.to_string(), "DRAW!");
    }
}
