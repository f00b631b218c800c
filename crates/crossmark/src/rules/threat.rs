//! Threat and fork detection.
//!
//! A threat is a line holding exactly two of a mark and one empty cell.
//! A fork is a move that leaves two or more threats at once. Detection
//! looks one ply ahead only.

use super::win::WIN_LINES;
use crate::position::Position;
use crate::types::{Board, Mark};
use tracing::{instrument, trace};

/// Returns the empty cell completing a line for `mark`.
///
/// Lines are scanned in fixed order and the first hit is returned.
#[instrument(skip(board))]
pub fn find_immediate_move(board: &Board, mark: Mark) -> Option<Position> {
    WIN_LINES.iter().find_map(|line| {
        let marks = line.marks(board);
        let held = marks.iter().filter(|m| **m == Some(mark)).count();
        let empty = marks.iter().position(Option::is_none);
        match (held, empty) {
            (2, Some(slot)) => Some(line.positions()[slot]),
            _ => None,
        }
    })
}

/// Counts lines with exactly two `mark` cells and one empty cell.
pub fn count_threats(board: &Board, mark: Mark) -> usize {
    WIN_LINES
        .iter()
        .filter(|line| {
            let marks = line.marks(board);
            marks.iter().filter(|m| **m == Some(mark)).count() == 2 && marks.contains(&None)
        })
        .count()
}

/// Returns every empty cell where placing `mark` creates two or more threats.
///
/// Candidates come back in ascending index order. `board` is not modified.
#[instrument(skip(board))]
pub fn find_fork_moves(board: &Board, mark: Mark) -> Vec<Position> {
    let mut scratch = board.clone();
    let mut forks = Vec::new();
    for position in board.empty_positions() {
        let Some(placed) = scratch.hypothetical(position, mark) else {
            continue;
        };
        let threats = count_threats(&placed, mark);
        drop(placed);
        trace!(%position, threats, "Evaluated fork candidate");
        if threats >= 2 {
            forks.push(position);
        }
    }
    forks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(x: &[usize], o: &[usize]) -> Board {
        let mut board = Board::new();
        for &i in x {
            board.set(i, Mark::X, 0).unwrap();
        }
        for &i in o {
            board.set(i, Mark::O, 0).unwrap();
        }
        board
    }

    #[test]
    fn test_immediate_move_completes_row() {
        let board = board_with(&[0, 1], &[4]);
        assert_eq!(find_immediate_move(&board, Mark::X), Some(Position::TopRight));
        assert_eq!(find_immediate_move(&board, Mark::O), None);
    }

    #[test]
    fn test_immediate_move_ignores_blocked_line() {
        let board = board_with(&[0, 1], &[2]);
        assert_eq!(find_immediate_move(&board, Mark::X), None);
    }

    #[test]
    fn test_immediate_move_first_line_in_scan_order() {
        // X threatens the middle row (slot 5) and the left column (slot 6).
        let board = board_with(&[3, 4, 0], &[1, 2]);
        assert_eq!(find_immediate_move(&board, Mark::X), Some(Position::MiddleRight));
    }

    #[test]
    fn test_fork_moves_opposite_corners() {
        // X . . / . O . / . . X
        let board = board_with(&[0, 8], &[4]);
        assert_eq!(
            find_fork_moves(&board, Mark::X),
            vec![Position::TopRight, Position::BottomLeft]
        );
        assert!(find_fork_moves(&board, Mark::O).is_empty());
        assert_eq!(board, board_with(&[0, 8], &[4]));
    }

    #[test]
    fn test_fork_moves_empty_board() {
        assert!(find_fork_moves(&Board::new(), Mark::X).is_empty());
    }

    #[test]
    fn test_count_threats() {
        let board = board_with(&[0, 2, 8], &[4]);
        // Top row (slot 1) and right column (slot 5).
        assert_eq!(count_threats(&board, Mark::X), 2);
        assert_eq!(count_threats(&board, Mark::O), 0);
    }
}
