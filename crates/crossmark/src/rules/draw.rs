//! Full-board and draw detection.

use super::win::find_win_line;
use crate::types::{Board, Mark};
use tracing::instrument;

/// Checks if the board is full (all cells occupied).
#[instrument(skip(board))]
pub fn is_full(board: &Board) -> bool {
    board.is_full()
}

/// A full board on which neither mark holds a line.
#[instrument(skip(board))]
pub fn is_draw(board: &Board) -> bool {
    is_full(board)
        && find_win_line(board, Mark::X).is_none()
        && find_win_line(board, Mark::O).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(layout: &str) -> Board {
        let mut board = Board::new();
        for (i, c) in layout.chars().enumerate() {
            match c {
                'X' => board.set(i, Mark::X, 0).unwrap(),
                'O' => board.set(i, Mark::O, 0).unwrap(),
                _ => continue,
            };
        }
        board
    }

    #[test]
    fn test_fresh_board_is_open() {
        let board = Board::new();
        assert!(!is_full(&board));
        assert!(!is_draw(&board));
    }

    #[test]
    fn test_partial_board_not_draw() {
        let board = fill("XO.OX....");
        assert!(!is_full(&board));
        assert!(!is_draw(&board));
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        // X O X / X O O / O X X
        let board = fill("XOXXOOOXX");
        assert!(is_full(&board));
        assert!(is_draw(&board));
    }

    #[test]
    fn test_full_board_with_line_is_not_draw() {
        // X X X / O O X / X O O
        let board = fill("XXXOOXXOO");
        assert!(is_full(&board));
        assert!(!is_draw(&board));
    }

    /// Line check over raw indices, independent of `WIN_LINES`.
    fn completes_line(marks: &[Mark; 9], mark: Mark) -> bool {
        let rows = (0..3).map(|r| [r * 3, r * 3 + 1, r * 3 + 2]);
        let cols = (0..3).map(|c| [c, c + 3, c + 6]);
        rows.chain(cols)
            .chain([[0, 4, 8], [2, 4, 6]])
            .any(|line| line.iter().all(|&i| marks[i] == mark))
    }

    #[test]
    fn test_every_full_layout_classified() {
        let mut draws = 0;
        for layout in 0u32..512 {
            let marks: [Mark; 9] =
                std::array::from_fn(|i| if (layout >> i) & 1 == 1 { Mark::X } else { Mark::O });
            let mut board = Board::new();
            for (i, mark) in marks.iter().enumerate() {
                board.set(i, *mark, 0).unwrap();
            }
            let x_line = completes_line(&marks, Mark::X);
            let o_line = completes_line(&marks, Mark::O);

            assert!(is_full(&board));
            assert_eq!(is_draw(&board), !x_line && !o_line, "layout {layout:09b}");
            assert_eq!(find_win_line(&board, Mark::X).is_some(), x_line, "layout {layout:09b}");
            assert_eq!(find_win_line(&board, Mark::O).is_some(), o_line, "layout {layout:09b}");
            if is_draw(&board) {
                draws += 1;
            }
        }
        // Only five-four splits can leave every line mixed.
        assert_eq!(draws, 32);
    }
}
