//! Tests for the computer's tiered move selection.

use crossmark::{
    AiProfile, Board, Decision, Mark, Position, Rates, SequenceSource, Tier, choose_move,
    count_threats, find_fork_moves,
};

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

fn never() -> AiProfile {
    AiProfile::new(
        "Never",
        "Trivial",
        (0, 0),
        Rates {
            take_win: 0.0,
            block_win: 0.0,
            take_center: 0.0,
            take_corner: 0.0,
            take_fork: 0.0,
            block_fork: 0.0,
        },
        0.0,
    )
}

fn decide(board: &Board, comp: Mark, profile: &AiProfile, rng: &mut SequenceSource) -> Decision {
    choose_move(board, comp, comp.opponent(), profile, rng).expect("Board has empty cells")
}

#[test]
fn test_failed_win_trial_falls_through_to_block() {
    // O can win at 8; X threatens 0.
    let board = board_with(&[1, 3, 6], &[2, 5]);
    let mut rng = SequenceSource::new([0.95, 0.1]);
    let decision = decide(&board, Mark::O, &AiProfile::smart(), &mut rng);
    assert_eq!(decision.position, Position::TopLeft);
    assert_eq!(decision.tier, Tier::Block);
    assert_eq!(rng.drawn(), 2);
}

#[test]
fn test_takes_own_fork() {
    let board = board_with(&[0, 8], &[4]);
    assert_eq!(
        find_fork_moves(&board, Mark::X),
        vec![Position::TopRight, Position::BottomLeft]
    );
    // Fork trial passes, pick draws the second candidate.
    let mut rng = SequenceSource::new([0.1, 0.9]);
    let decision = decide(&board, Mark::X, &AiProfile::smart(), &mut rng);
    assert_eq!(decision.position, Position::BottomLeft);
    assert_eq!(decision.tier, Tier::Fork);
}

#[test]
fn test_occupies_opponent_fork() {
    let board = board_with(&[0, 8], &[4]);
    let mut rng = SequenceSource::new([0.2, 0.0]);
    let decision = decide(&board, Mark::O, &AiProfile::smart(), &mut rng);
    assert_eq!(decision.position, Position::TopRight);
    assert_eq!(decision.tier, Tier::BlockFork);
    assert_eq!(rng.drawn(), 2);
}

#[test]
fn test_fork_detection_leaves_board_untouched() {
    let board = board_with(&[0, 8], &[4]);
    let before = board.clone();
    let _ = find_fork_moves(&board, Mark::X);
    assert_eq!(board, before);
    assert_eq!(count_threats(&board, Mark::X), 0);
}

#[test]
fn test_takes_center_on_empty_board() {
    let mut rng = SequenceSource::new([0.5]);
    let decision = decide(&Board::new(), Mark::O, &AiProfile::smart(), &mut rng);
    assert_eq!(decision.position, Position::Center);
    assert_eq!(decision.tier, Tier::Center);
    assert_eq!(rng.drawn(), 1);
}

#[test]
fn test_plain_corner_weights_when_corner_trial_fails() {
    // Center fails, mistake fails, corner fails, weighted draw at zero.
    let mut rng = SequenceSource::new([0.9, 0.9, 0.9, 0.0]);
    let decision = decide(&Board::new(), Mark::O, &AiProfile::smart(), &mut rng);
    assert_eq!(decision.position, Position::TopLeft);
    assert_eq!(decision.tier, Tier::Positional { mistake: false });
    assert_eq!(rng.drawn(), 4);
}

#[test]
fn test_mistake_skips_corner_trial() {
    // Center fails, mistake passes; the draw near one lands on the last side.
    let mut rng = SequenceSource::new([0.9, 0.1, 0.99]);
    let decision = decide(&Board::new(), Mark::O, &AiProfile::smart(), &mut rng);
    assert_eq!(decision.position, Position::BottomCenter);
    assert_eq!(decision.tier, Tier::Positional { mistake: true });
    assert_eq!(rng.drawn(), 3);
}

#[test]
fn test_fallback_when_only_center_remains() {
    let board = board_with(&[0, 2, 3, 7], &[1, 5, 6, 8]);
    let mut rng = SequenceSource::new([0.5]);
    let decision = decide(&board, Mark::X, &never(), &mut rng);
    assert_eq!(decision.position, Position::Center);
    assert_eq!(decision.tier, Tier::Fallback);
    // Center trial, mistake trial, uniform pick.
    assert_eq!(rng.drawn(), 3);
}

#[test]
fn test_zero_rates_still_draw_one_trial_per_available_tier() {
    let board = board_with(&[1, 3, 6], &[2, 5]);
    let mut rng = SequenceSource::new([0.5]);
    let decision = decide(&board, Mark::O, &never(), &mut rng);
    assert!(board.is_empty(decision.position));
    assert!(matches!(decision.tier, Tier::Positional { .. }));
}

#[test]
fn test_move_always_lands_on_empty_cell() {
    let board = board_with(&[0, 4], &[8]);
    for sample in [0.0, 0.25, 0.5, 0.75, 0.999] {
        let mut rng = SequenceSource::new([sample]);
        let decision = decide(&board, Mark::O, &AiProfile::smart(), &mut rng);
        assert!(board.is_empty(decision.position), "sample {sample}");
    }
}
