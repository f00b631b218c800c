//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`](crate::Board). Rules are kept apart from
//! board storage so the session and the heuristic engine share them.

pub mod draw;
pub mod threat;
pub mod win;

pub use draw::{is_draw, is_full};
pub use threat::{count_threats, find_fork_moves, find_immediate_move};
pub use win::{WIN_LINES, WinLine, check_winner, find_win_line};
