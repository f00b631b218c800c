//! Clock and input driver for a terminal match.
//!
//! Reads commands from stdin, runs the session's scheduled timers as tokio
//! sleeps and hands fired tokens back to the session over an mpsc channel.

use crate::render;
use anyhow::{Context, Result};
use crossmark::{EndControl, MatchSession, Mode, Phase, TimerToken, UniformSource};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, info, instrument};

/// A parsed input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Cell index 0-8.
    Cell(usize),
    /// Pause the round.
    Pause,
    /// Resume the round.
    Resume,
    /// Play again from the end screen.
    PlayAgain,
    /// Return to the main menu.
    Menu,
    /// Start a match from the main menu.
    Start,
    /// Leave the program.
    Quit,
}

impl Input {
    /// Parses one line; cells are numbered 1-9 as rendered.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let input = match line {
            "p" => Input::Pause,
            "r" => Input::Resume,
            "a" => Input::PlayAgain,
            "m" => Input::Menu,
            "s" => Input::Start,
            "q" => Input::Quit,
            _ => {
                let n: usize = line.parse().ok()?;
                if !(1..=9).contains(&n) {
                    return None;
                }
                Input::Cell(n - 1)
            }
        };
        Some(input)
    }
}

/// Drives one session against stdin and tokio timers.
pub struct Driver<R> {
    session: MatchSession<R>,
    mode: Mode,
    json: bool,
    timer_tx: mpsc::UnboundedSender<TimerToken>,
    timer_rx: mpsc::UnboundedReceiver<TimerToken>,
}

impl<R: UniformSource> Driver<R> {
    /// Creates a driver; the match starts on [`Driver::run`].
    pub fn new(session: MatchSession<R>, mode: Mode, json: bool) -> Self {
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        Self {
            session,
            mode,
            json,
            timer_tx,
            timer_rx,
        }
    }

    /// Runs until `q` or end of input.
    #[instrument(skip(self), fields(mode = ?self.mode, json = self.json))]
    pub async fn run(mut self) -> Result<()> {
        info!("Starting terminal match");
        let mut out = std::io::stdout();
        self.session.start_match(self.mode);
        self.flush(&mut out)?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read stdin")? else {
                        debug!("Input closed");
                        break;
                    };
                    if !self.handle_line(&line, &mut out)? {
                        break;
                    }
                }
                Some(token) = self.timer_rx.recv() => {
                    self.session.fire_timer(token);
                }
            }
            self.flush(&mut out)?;
        }
        info!(scores = ?self.session.scores(), "Leaving terminal match");
        Ok(())
    }

    /// Applies one input line. Returns false when the user quits.
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<bool> {
        let Some(input) = Input::parse(line) else {
            self.notice(out, &format!("Unknown command: {}", line.trim()))?;
            return Ok(true);
        };
        debug!(?input, "Handling input");
        let rejected = match input {
            Input::Quit => return Ok(false),
            Input::Cell(index) => {
                if self.session.report_cell_activation(index) {
                    None
                } else {
                    Some("Move not accepted".to_string())
                }
            }
            Input::Pause => self.session.pause().err().map(|e| e.to_string()),
            Input::Resume => self.session.resume().err().map(|e| e.to_string()),
            Input::PlayAgain => match self.session.activate_end_control(EndControl::PlayAgain) {
                Ok(true) => None,
                Ok(false) => Some("Not ready yet".to_string()),
                Err(e) => Some(e.to_string()),
            },
            Input::Menu => {
                if self.session.is_game_over() {
                    match self.session.activate_end_control(EndControl::MainMenu) {
                        Ok(true) => None,
                        Ok(false) => Some("Not ready yet".to_string()),
                        Err(e) => Some(e.to_string()),
                    }
                } else {
                    self.session.return_to_menu().err().map(|e| e.to_string())
                }
            }
            Input::Start => {
                if self.session.phase() == Phase::Idle {
                    self.session.start_match(self.mode);
                    None
                } else {
                    Some("Return to the menu first".to_string())
                }
            }
        };
        if let Some(reason) = rejected {
            self.notice(out, &reason)?;
        }
        Ok(true)
    }

    /// Schedules new timers and writes pending events and the board.
    pub fn flush<W: Write>(&mut self, out: &mut W) -> Result<()> {
        for timer in self.session.drain_scheduled() {
            let tx = self.timer_tx.clone();
            debug!(token = timer.token.value(), kind = %timer.kind, "Scheduling timer");
            tokio::spawn(async move {
                sleep(timer.delay).await;
                // Receiver gone means the driver has exited.
                let _ = tx.send(timer.token);
            });
        }

        let events = self.session.drain_events();
        if events.is_empty() {
            return Ok(());
        }
        let mode = self.session.mode();
        for event in &events {
            if self.json {
                writeln!(out, "{}", render::json_line(event)?)?;
            } else if let Some(text) = render::describe(event, mode) {
                writeln!(out, "{}", text)?;
            }
        }
        if !self.json {
            let snapshot = self.session.snapshot();
            if snapshot.phase != Phase::Idle {
                writeln!(out, "\n{}\n", render::board(&snapshot))?;
            }
            writeln!(out, "{}", render::hud(&snapshot))?;
            writeln!(out, "{}", render::prompt(&snapshot))?;
        }
        out.flush()?;
        Ok(())
    }

    fn notice<W: Write>(&self, out: &mut W, message: &str) -> Result<()> {
        if self.json {
            let line = serde_json::json!({ "event": "rejected", "reason": message });
            writeln!(out, "{}", line)?;
        } else {
            writeln!(out, "! {}", message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossmark::{GameConfig, Mark, SequenceSource};

    fn driver(mode: Mode) -> Driver<SequenceSource> {
        let mut session = MatchSession::new(GameConfig::default(), SequenceSource::default());
        session.start_match(mode);
        Driver::new(session, mode, false)
    }

    #[test]
    fn test_parse_inputs() {
        assert_eq!(Input::parse("5\n"), Some(Input::Cell(4)));
        assert_eq!(Input::parse(" p "), Some(Input::Pause));
        assert_eq!(Input::parse("0"), None);
        assert_eq!(Input::parse("10"), None);
        assert_eq!(Input::parse("x"), None);
    }

    #[test]
    fn test_lines_play_a_round() {
        let mut driver = driver(Mode::PlayerVsPlayer {
            player_one: Mark::X,
        });
        let mut out = Vec::new();
        for line in ["1", "4", "2", "5", "3"] {
            assert!(driver.handle_line(line, &mut out).unwrap());
        }
        assert_eq!(driver.session.scores().x, 1);
        assert!(out.is_empty());
        assert!(!driver.handle_line("q", &mut out).unwrap());
    }

    #[test]
    fn test_rejections_are_reported() {
        let mut driver = driver(Mode::PlayerVsPlayer {
            player_one: Mark::X,
        });
        let mut out = Vec::new();
        driver.handle_line("r", &mut out).unwrap();
        driver.handle_line("hello", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("! Round is not paused"));
        assert!(text.contains("! Unknown command: hello"));
    }

    #[test]
    fn test_menu_then_start() {
        let mode = Mode::PlayerVsPlayer {
            player_one: Mark::X,
        };
        let mut driver = driver(mode);
        let mut out = Vec::new();
        driver.handle_line("m", &mut out).unwrap();
        assert_eq!(driver.session.phase(), Phase::Idle);
        driver.handle_line("s", &mut out).unwrap();
        assert_eq!(driver.session.phase(), Phase::InRound);
        assert!(out.is_empty());
    }
}
