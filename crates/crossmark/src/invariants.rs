//! First-class board invariants.
//!
//! Invariants are logical properties that hold after every placement.
//! The session checks them in debug builds; tests check them directly.

use crate::rules::find_win_line;
use crate::types::{Board, Mark};
use tracing::warn;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants checked together.
pub trait InvariantSet<S> {
    /// Checks all invariants, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn collect<S>(
    checks: &[(fn(&S) -> bool, &'static str)],
    state: &S,
) -> Result<(), Vec<InvariantViolation>> {
    let violations: Vec<_> = checks
        .iter()
        .filter(|(holds, _)| !holds(state))
        .map(|(_, description)| InvariantViolation::new(*description))
        .collect();
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let checks: [(fn(&S) -> bool, &'static str); 2] =
            [(I1::holds, I1::description()), (I2::holds, I2::description())];
        collect(&checks, state)
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let checks: [(fn(&S) -> bool, &'static str); 3] = [
            (I1::holds, I1::description()),
            (I2::holds, I2::description()),
            (I3::holds, I3::description()),
        ];
        collect(&checks, state)
    }
}

/// Every occupied cell appears exactly once in the placement history.
pub struct HistoryConsistent;

impl Invariant<Board> for HistoryConsistent {
    fn holds(board: &Board) -> bool {
        let occupied = board.cells().iter().filter(|c| !c.is_empty()).count();
        let history = board.history();
        let mut seen = [false; 9];
        for position in history {
            let i = position.to_index();
            if seen[i] || board.is_empty(*position) {
                return false;
            }
            seen[i] = true;
        }
        occupied == history.len()
    }

    fn description() -> &'static str {
        "Placement history matches occupied cells"
    }
}

/// Consecutive placements alternate marks.
pub struct AlternatingMarks;

impl Invariant<Board> for AlternatingMarks {
    fn holds(board: &Board) -> bool {
        board
            .history()
            .windows(2)
            .all(|pair| board.get(pair[0]) != board.get(pair[1]))
    }

    fn description() -> &'static str {
        "Marks alternate in placement order"
    }
}

/// At most one mark holds a complete line.
pub struct SingleWinner;

impl Invariant<Board> for SingleWinner {
    fn holds(board: &Board) -> bool {
        find_win_line(board, Mark::X).is_none() || find_win_line(board, Mark::O).is_none()
    }

    fn description() -> &'static str {
        "At most one mark completes a line"
    }
}

/// Invariants checked after every placement.
pub type BoardInvariants = (HistoryConsistent, AlternatingMarks, SingleWinner);

/// Asserts board invariants in debug builds.
pub fn debug_assert_board(board: &Board) {
    let result = BoardInvariants::check_all(board);
    if let Err(violations) = &result {
        for violation in violations {
            warn!(description = %violation.description, "Board invariant violated");
        }
    }
    debug_assert!(result.is_ok(), "Board invariants violated: {:?}", result);
}
