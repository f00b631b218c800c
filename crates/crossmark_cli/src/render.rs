//! Text rendering of snapshots and events.

use anyhow::Result;
use crossmark::{GameEvent, Mark, Mode, Outcome, Phase, Snapshot};

/// Renders the board with empty cells numbered 1-9.
pub fn board(snapshot: &Snapshot) -> String {
    let mut rows = Vec::with_capacity(3);
    for (r, cells) in snapshot.board.chunks(3).enumerate() {
        let line: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(c, cell)| match cell {
                Some(mark) => mark.to_string(),
                None => (r * 3 + c + 1).to_string(),
            })
            .collect();
        rows.push(line.join("|"));
    }
    rows.join("\n-+-+-\n")
}

/// Renders the score line and turn text.
pub fn hud(snapshot: &Snapshot) -> String {
    let mut line = format!(
        "RED {} - {} BLUE | Round {}",
        snapshot.scores.x, snapshot.scores.o, snapshot.round
    );
    if !snapshot.turn_label.is_empty() {
        line.push_str(" | ");
        line.push_str(&snapshot.turn_label);
    }
    if snapshot.ai_thinking {
        line.push_str(" (thinking...)");
    }
    line
}

/// Hint for the keys accepted in the current phase.
pub fn prompt(snapshot: &Snapshot) -> &'static str {
    match snapshot.phase {
        Phase::Idle => "[s] start  [q] quit",
        Phase::InRound => "[1-9] place  [p] pause  [m] menu  [q] quit",
        Phase::Paused => "[r] resume  [m] menu  [q] quit",
        Phase::RoundOver => "[a] play again  [m] menu  [q] quit",
        Phase::MatchOver => "[m] menu  [q] quit",
    }
}

fn team(mark: Mark) -> String {
    mark.team().to_string()
}

/// Text line for an event, or `None` for events with no text form.
pub fn describe(event: &GameEvent, mode: Option<Mode>) -> Option<String> {
    let text = match event {
        GameEvent::MatchStarted { mode } => match mode {
            Mode::PlayerVsPlayer { player_one } => {
                format!("New match: player 1 is {}", team(*player_one))
            }
            Mode::PlayerVsComputer { human } => {
                format!("New match: you are {}", team(*human))
            }
        },
        GameEvent::MovePlaced { mark, position, .. } => {
            format!("{} placed {} on {}", team(*mark), mark, position)
        }
        GameEvent::RoundWon { winner } | GameEvent::RoundLost { winner } => {
            Outcome::Winner(*winner).to_string()
        }
        GameEvent::RoundDraw => Outcome::Draw.to_string(),
        GameEvent::MatchComplete { winner } => match mode {
            Some(Mode::PlayerVsComputer { human }) if human == *winner => {
                "You won the match!".to_string()
            }
            Some(Mode::PlayerVsComputer { .. }) => "The computer won the match.".to_string(),
            _ => format!("{} takes the match!", team(*winner)),
        },
        GameEvent::Paused => "Paused".to_string(),
        GameEvent::Resumed => "Resumed".to_string(),
        GameEvent::ReturnedToMenu => "Main menu".to_string(),
        GameEvent::TurnChanged { .. }
        | GameEvent::ComputerThinking { .. }
        | GameEvent::ScoreAwarded { .. }
        | GameEvent::EndControlsArmed => return None,
    };
    Some(text)
}

/// One JSON line per event.
pub fn json_line(event: &GameEvent) -> Result<String> {
    Ok(serde_json::to_string(event)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossmark::{GameConfig, MatchSession, Position, SequenceSource};

    fn session() -> MatchSession<SequenceSource> {
        let mut session = MatchSession::new(GameConfig::default(), SequenceSource::default());
        session.start_match(Mode::PlayerVsComputer { human: Mark::X });
        session
    }

    #[test]
    fn test_board_numbers_empty_cells() {
        let mut session = session();
        session.apply_move(4).unwrap();
        assert_eq!(board(&session.snapshot()), "1|2|3\n-+-+-\n4|X|6\n-+-+-\n7|8|9");
    }

    #[test]
    fn test_hud_shows_turn_and_thinking() {
        let mut session = session();
        assert_eq!(hud(&session.snapshot()), "RED 0 - 0 BLUE | Round 1 | Your Turn");
        session.apply_move(0).unwrap();
        assert_eq!(
            hud(&session.snapshot()),
            "RED 0 - 0 BLUE | Round 1 | Computer Turn (thinking...)"
        );
    }

    #[test]
    fn test_describe_events() {
        let mode = Some(Mode::PlayerVsComputer { human: Mark::O });
        let placed = GameEvent::MovePlaced {
            mark: Mark::X,
            position: Position::Center,
            tier: None,
        };
        assert_eq!(describe(&placed, mode).as_deref(), Some("RED placed X on Center"));
        assert_eq!(
            describe(&GameEvent::RoundLost { winner: Mark::X }, mode).as_deref(),
            Some("RED WINS!")
        );
        assert_eq!(
            describe(&GameEvent::MatchComplete { winner: Mark::X }, mode).as_deref(),
            Some("The computer won the match.")
        );
        assert_eq!(describe(&GameEvent::EndControlsArmed, mode), None);
    }

    #[test]
    fn test_json_line_is_tagged() {
        let line = json_line(&GameEvent::Paused).unwrap();
        assert_eq!(line, r#"{"event":"paused"}"#);
    }
}
