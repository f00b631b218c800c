//! Core domain types: marks, cells and the 3x3 board.

use crate::error::MoveError;
use crate::position::Position;
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use tracing::instrument;

/// A player's mark.
///
/// `X` plays for the red team and `O` for the blue team.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum Mark {
    /// Red team.
    X,
    /// Blue team.
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Returns the team this mark plays for.
    pub fn team(self) -> Team {
        match self {
            Mark::X => Team::Red,
            Mark::O => Team::Blue,
        }
    }
}

/// Team colour shown to players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Team {
    /// Plays `X`.
    Red,
    /// Plays `O`.
    Blue,
}

impl Team {
    /// Returns the mark played by this team.
    pub fn mark(self) -> Mark {
        match self {
            Team::Red => Mark::X,
            Team::Blue => Mark::O,
        }
    }
}

/// A single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    /// Mark occupying the cell, if any.
    pub value: Option<Mark>,
    /// Milliseconds since the round began when the mark was placed.
    ///
    /// Presentation metadata only.
    pub placed_at: u64,
}

impl Cell {
    /// Returns true if no mark occupies the cell.
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}

/// 3x3 board with placement history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Cells in row-major order (0-8).
    cells: [Cell; 9],
    /// Positions in placement order.
    history: Vec<Position>,
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::default(); 9],
            history: Vec::new(),
        }
    }

    /// Clears every cell and the placement history.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Places `mark` at `index`.
    ///
    /// Fails if the index is outside 0-8 or the cell is already occupied.
    #[instrument(skip(self))]
    pub fn set(&mut self, index: usize, mark: Mark, placed_at: u64) -> Result<Position, MoveError> {
        let position = Position::from_index(index).ok_or(MoveError::OutOfRange(index))?;
        let cell = &mut self.cells[position.to_index()];
        if !cell.is_empty() {
            return Err(MoveError::Occupied(position));
        }
        *cell = Cell {
            value: Some(mark),
            placed_at,
        };
        self.history.push(position);
        Ok(position)
    }

    /// Returns the cell at `position`.
    pub fn cell(&self, position: Position) -> Cell {
        self.cells[position.to_index()]
    }

    /// Returns the mark at `position`, if any.
    pub fn get(&self, position: Position) -> Option<Mark> {
        self.cell(position).value
    }

    /// Checks if the cell at `position` is empty.
    pub fn is_empty(&self, position: Position) -> bool {
        self.cell(position).is_empty()
    }

    /// Returns true when no cell is empty.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    /// Returns the unoccupied positions in ascending index order.
    pub fn empty_positions(&self) -> Vec<Position> {
        Position::ALL
            .iter()
            .copied()
            .filter(|&p| self.is_empty(p))
            .collect()
    }

    /// Returns the unoccupied indices in ascending order.
    pub fn empty_indices(&self) -> Vec<usize> {
        self.empty_positions()
            .into_iter()
            .map(Position::to_index)
            .collect()
    }

    /// Returns all cells in row-major order.
    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// Returns the marks in row-major order.
    pub fn marks(&self) -> [Option<Mark>; 9] {
        self.cells.map(|c| c.value)
    }

    /// Returns the positions in the order they were played.
    pub fn history(&self) -> &[Position] {
        &self.history
    }

    /// Places `mark` at `position` for the lifetime of the returned guard.
    ///
    /// Returns `None` if the cell is occupied. The cell is restored when the
    /// guard drops.
    pub fn hypothetical(&mut self, position: Position, mark: Mark) -> Option<Hypothetical<'_>> {
        let index = position.to_index();
        if !self.cells[index].is_empty() {
            return None;
        }
        let previous = self.cells[index];
        self.cells[index].value = Some(mark);
        Some(Hypothetical {
            board: self,
            index,
            previous,
        })
    }

    /// Formats the board as text, numbering empty cells 1-9.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.cells[pos].value {
                    None => (pos + 1).to_string(),
                    Some(mark) => mark.to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped hypothetical placement; restores the cell on drop.
#[derive(Debug)]
pub struct Hypothetical<'a> {
    board: &'a mut Board,
    index: usize,
    previous: Cell,
}

impl Deref for Hypothetical<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        &*self.board
    }
}

impl Drop for Hypothetical<'_> {
    fn drop(&mut self) {
        self.board.cells[self.index] = self.previous;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_rejects_out_of_range() {
        let mut board = Board::new();
        assert_eq!(board.set(9, Mark::X, 0), Err(MoveError::OutOfRange(9)));
        assert!(board.history().is_empty());
    }

    #[test]
    fn test_set_rejects_occupied() {
        let mut board = Board::new();
        board.set(4, Mark::X, 0).unwrap();
        assert_eq!(
            board.set(4, Mark::O, 10),
            Err(MoveError::Occupied(Position::Center))
        );
        assert_eq!(board.get(Position::Center), Some(Mark::X));
        assert_eq!(board.history(), &[Position::Center]);
    }

    #[test]
    fn test_empty_indices_ascending() {
        let mut board = Board::new();
        board.set(7, Mark::X, 0).unwrap();
        board.set(0, Mark::O, 0).unwrap();
        assert_eq!(board.empty_indices(), vec![1, 2, 3, 4, 5, 6, 8]);
    }

    #[test]
    fn test_hypothetical_restores_on_drop() {
        let mut board = Board::new();
        board.set(0, Mark::X, 0).unwrap();
        {
            let guard = board.hypothetical(Position::Center, Mark::O).unwrap();
            assert_eq!(guard.get(Position::Center), Some(Mark::O));
        }
        assert!(board.is_empty(Position::Center));
        assert!(board.hypothetical(Position::TopLeft, Mark::O).is_none());
        assert_eq!(board.get(Position::TopLeft), Some(Mark::X));
    }

    #[test]
    fn test_display_numbers_empty_cells() {
        let mut board = Board::new();
        board.set(0, Mark::X, 0).unwrap();
        board.set(4, Mark::O, 0).unwrap();
        assert_eq!(board.display(), "X|2|3\n-+-+-\n4|O|6\n-+-+-\n7|8|9");
    }

    #[test]
    fn test_team_mapping() {
        assert_eq!(Mark::X.team().to_string(), "RED");
        assert_eq!(Team::Blue.mark(), Mark::O);
        assert_eq!(Mark::O.opponent(), Mark::X);
    }
}
