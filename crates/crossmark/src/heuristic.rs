//! Probabilistic move selection for the computer opponent.
//!
//! Tiers are tried in strict priority order. Each tier whose move exists is
//! gated by one Bernoulli trial at the profile's rate; a failed trial falls
//! through to the next tier even when the better move is on the board.

use crate::config::AiProfile;
use crate::position::Position;
use crate::random::UniformSource;
use crate::rules::{find_fork_moves, find_immediate_move};
use crate::types::{Board, Mark};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Corner weight when the corner trial passes.
const CORNER_PREFERRED: f64 = 2.2;
/// Corner weight when the corner trial fails.
const CORNER_PLAIN: f64 = 1.4;
/// Side weight on a regular positional move.
const SIDE_PLAIN: f64 = 1.25;
/// Corner weight on a mistake.
const CORNER_MISTAKE: f64 = 1.0;
/// Side weight on a mistake.
const SIDE_MISTAKE: f64 = 2.0;

/// Priority tier that produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Tier {
    /// Completed an own line.
    Win,
    /// Blocked an opponent line.
    Block,
    /// Played an own fork.
    Fork,
    /// Occupied an opponent fork cell.
    BlockFork,
    /// Took the center.
    Center,
    /// Weighted corner/side draw.
    Positional {
        /// The draw used mistake weights.
        mistake: bool,
    },
    /// Uniform pick among the remaining empty cells.
    Fallback,
}

/// A chosen cell and the tier that chose it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Cell to play.
    pub position: Position,
    /// Tier that produced the cell.
    pub tier: Tier,
}

impl Decision {
    fn new(position: Position, tier: Tier) -> Self {
        Self { position, tier }
    }
}

/// Picks the computer's move.
///
/// Returns `None` only for a full board.
#[instrument(skip(board, profile, rng), fields(profile = %profile.name()))]
pub fn choose_move<R: UniformSource>(
    board: &Board,
    comp: Mark,
    human: Mark,
    profile: &AiProfile,
    rng: &mut R,
) -> Option<Decision> {
    let empties = board.empty_positions();
    if empties.is_empty() {
        debug!("No empty cells");
        return None;
    }
    let rates = profile.rates();

    if let Some(win) = find_immediate_move(board, comp)
        && rng.chance(rates.take_win)
    {
        return Some(Decision::new(win, Tier::Win));
    }

    if let Some(block) = find_immediate_move(board, human)
        && rng.chance(rates.block_win)
    {
        return Some(Decision::new(block, Tier::Block));
    }

    let forks = find_fork_moves(board, comp);
    if !forks.is_empty()
        && rng.chance(rates.take_fork)
        && let Some(fork) = rng.pick(&forks)
    {
        return Some(Decision::new(fork, Tier::Fork));
    }

    let human_forks = find_fork_moves(board, human);
    if !human_forks.is_empty()
        && rng.chance(rates.block_fork)
        && let Some(fork) = rng.pick(&human_forks)
    {
        return Some(Decision::new(fork, Tier::BlockFork));
    }

    if board.is_empty(Position::Center) && rng.chance(rates.take_center) {
        return Some(Decision::new(Position::Center, Tier::Center));
    }

    positional(board, profile, rng, &empties)
}

/// Weighted corner/side draw, falling back to a uniform pick.
fn positional<R: UniformSource>(
    board: &Board,
    profile: &AiProfile,
    rng: &mut R,
    empties: &[Position],
) -> Option<Decision> {
    let corners: Vec<Position> = Position::CORNERS
        .into_iter()
        .filter(|&p| board.is_empty(p))
        .collect();
    let sides: Vec<Position> = Position::SIDES
        .into_iter()
        .filter(|&p| board.is_empty(p))
        .collect();

    let mistake = rng.chance(*profile.mistake_chance());

    let mut candidates = Vec::with_capacity(corners.len() + sides.len());
    if !corners.is_empty() {
        let weight = if mistake {
            CORNER_MISTAKE
        } else if rng.chance(profile.rates().take_corner) {
            CORNER_PREFERRED
        } else {
            CORNER_PLAIN
        };
        candidates.extend(corners.into_iter().map(|p| (p, weight)));
    }
    if !sides.is_empty() {
        let weight = if mistake { SIDE_MISTAKE } else { SIDE_PLAIN };
        candidates.extend(sides.into_iter().map(|p| (p, weight)));
    }

    if candidates.is_empty() {
        return rng
            .pick(empties)
            .map(|p| Decision::new(p, Tier::Fallback));
    }

    weighted_pick(rng, &candidates).map(|p| Decision::new(p, Tier::Positional { mistake }))
}

/// Draws one candidate with probability proportional to its weight.
///
/// Subtracts weights in enumeration order from `u * sum` and selects the
/// first candidate that brings the remainder to zero or below.
pub fn weighted_pick<R: UniformSource>(
    rng: &mut R,
    candidates: &[(Position, f64)],
) -> Option<Position> {
    let (last, _) = *candidates.last()?;
    let sum: f64 = candidates.iter().map(|(_, w)| w).sum();
    let mut r = rng.sample() * sum;
    for &(position, weight) in candidates {
        r -= weight;
        if r <= 0.0 {
            return Some(position);
        }
    }
    Some(last)
}
