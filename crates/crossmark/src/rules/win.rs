//! Win detection logic for tic-tac-toe.

use crate::position::Position;
use crate::types::{Board, Mark};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Three positions forming a winning line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WinLine(pub [Position; 3]);

impl WinLine {
    /// Returns the positions of the line.
    pub fn positions(&self) -> [Position; 3] {
        self.0
    }

    /// Returns the board indices of the line.
    pub fn indices(&self) -> [usize; 3] {
        self.0.map(Position::to_index)
    }

    /// Returns the marks currently on the line.
    pub fn marks(&self, board: &Board) -> [Option<Mark>; 3] {
        self.0.map(|p| board.get(p))
    }
}

/// All winning lines in scan order: rows, columns, diagonals.
pub const WIN_LINES: [WinLine; 8] = [
    // Rows
    WinLine([Position::TopLeft, Position::TopCenter, Position::TopRight]),
    WinLine([Position::MiddleLeft, Position::Center, Position::MiddleRight]),
    WinLine([Position::BottomLeft, Position::BottomCenter, Position::BottomRight]),
    // Columns
    WinLine([Position::TopLeft, Position::MiddleLeft, Position::BottomLeft]),
    WinLine([Position::TopCenter, Position::Center, Position::BottomCenter]),
    WinLine([Position::TopRight, Position::MiddleRight, Position::BottomRight]),
    // Diagonals
    WinLine([Position::TopLeft, Position::Center, Position::BottomRight]),
    WinLine([Position::TopRight, Position::Center, Position::BottomLeft]),
];

/// Returns the first line, in scan order, fully held by `mark`.
#[instrument(skip(board))]
pub fn find_win_line(board: &Board, mark: Mark) -> Option<WinLine> {
    WIN_LINES
        .iter()
        .copied()
        .find(|line| line.marks(board).iter().all(|m| *m == Some(mark)))
}

/// Checks if there is a winner on the board.
///
/// Returns `Some(mark)` if that mark holds a complete line.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<Mark> {
    [Mark::X, Mark::O]
        .into_iter()
        .find(|&mark| find_win_line(board, mark).is_some())
}
