//! The match session: turn state machine, scoring and timers.
//!
//! [`MatchSession`] owns everything a match needs (mode, scores, the
//! current round, timers, pending events and the random source). Input
//! collaborators call into it; presentation collaborators read snapshots and
//! drain events; a clock driver runs the scheduled timers and fires their
//! tokens back.

use crate::config::GameConfig;
use crate::error::{MoveError, TransitionError};
use crate::events::GameEvent;
use crate::heuristic::{Tier, choose_move};
use crate::invariants::debug_assert_board;
use crate::phases::{EndControl, Mode, Outcome, Phase, Scores};
use crate::position::Position;
use crate::random::{RngSource, UniformSource};
use crate::rules::{WinLine, find_win_line};
use crate::schedule::{ScheduledTimer, TimerKind, TimerToken, Timers};
use crate::types::{Board, Mark};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, trace, warn};

/// State of the round being played.
#[derive(Debug, Clone)]
struct Round {
    board: Board,
    current: Mark,
    paused: bool,
    outcome: Option<Outcome>,
    win_line: Option<WinLine>,
    started_at: Instant,
}

impl Round {
    fn new(first: Mark) -> Self {
        Self {
            board: Board::new(),
            current: first,
            paused: false,
            outcome: None,
            win_line: None,
            started_at: Instant::now(),
        }
    }
}

/// Read-only view handed to presentation collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Lifecycle phase.
    pub phase: Phase,
    /// Mode of the current or last match.
    pub mode: Option<Mode>,
    /// Marks in row-major order; empty when idle.
    pub board: [Option<Mark>; 9],
    /// Mark to move.
    pub current: Option<Mark>,
    /// HUD turn text.
    pub turn_label: String,
    /// Winning line of the finished round.
    pub win_line: Option<[usize; 3]>,
    /// Match scores.
    pub scores: Scores,
    /// Round number, starting at 1.
    pub round: u32,
    /// Result of the most recent finished round.
    pub last_result: Option<Outcome>,
    /// A computer move is pending.
    pub ai_thinking: bool,
    /// End-of-round controls accept input.
    pub end_controls_armed: bool,
    /// A side reached the win threshold.
    pub match_complete: bool,
}

/// A tic-tac-toe match between two humans or a human and the computer.
#[derive(Debug)]
pub struct MatchSession<R> {
    config: GameConfig,
    rng: R,
    mode: Option<Mode>,
    scores: Scores,
    round_number: u32,
    last_result: Option<Outcome>,
    round: Option<Round>,
    timers: Timers,
    end_controls_armed: bool,
    events: Vec<GameEvent>,
}

impl MatchSession<RngSource<StdRng>> {
    /// Creates a session backed by a seeded standard generator.
    pub fn seeded(config: GameConfig, seed: u64) -> Self {
        Self::new(config, RngSource::new(StdRng::seed_from_u64(seed)))
    }

    /// Creates a session backed by an OS-seeded standard generator.
    pub fn from_entropy(config: GameConfig) -> Self {
        Self::new(config, RngSource::new(StdRng::from_os_rng()))
    }
}

impl<R: UniformSource> MatchSession<R> {
    /// Creates an idle session.
    #[instrument(skip(config, rng), fields(profile = %config.profile().name()))]
    pub fn new(config: GameConfig, rng: R) -> Self {
        info!("Creating match session");
        Self {
            config,
            rng,
            mode: None,
            scores: Scores::default(),
            round_number: 0,
            last_result: None,
            round: None,
            timers: Timers::new(),
            end_controls_armed: false,
            events: Vec::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Lifecycle
    // ─────────────────────────────────────────────────────────────

    /// Starts a new match, discarding any match in progress.
    ///
    /// Scores reset, the round counter restarts at 1 and the configured
    /// initial mark opens the first round.
    #[instrument(skip(self))]
    pub fn start_match(&mut self, mode: Mode) {
        info!("Starting match");
        self.mode = Some(mode);
        self.scores = Scores::default();
        self.round_number = 1;
        self.last_result = None;
        self.events.push(GameEvent::MatchStarted { mode });
        let first = *self.config.first_mark();
        self.reset_round(first);
    }

    /// Starts the next round of the current match.
    ///
    /// The loser of the previous round opens; after a draw the opener is
    /// chosen at random. Returns the opening mark.
    #[instrument(skip(self))]
    pub fn next_round(&mut self) -> Result<Mark, TransitionError> {
        let round = self.round.as_ref().ok_or(TransitionError::NoActiveMatch)?;
        if round.outcome.is_none() {
            return Err(TransitionError::RoundInProgress);
        }
        if self.is_match_complete() {
            debug!("Next round refused: match complete");
            return Err(TransitionError::MatchComplete);
        }
        let first = match self.last_result.and_then(|r| r.winner()) {
            Some(winner) => winner.opponent(),
            None => {
                if self.rng.chance(0.5) {
                    Mark::X
                } else {
                    Mark::O
                }
            }
        };
        self.round_number += 1;
        info!(round = self.round_number, first = %first, "Starting next round");
        self.reset_round(first);
        Ok(first)
    }

    /// Leaves the match for the main menu, cancelling all timers.
    #[instrument(skip(self))]
    pub fn return_to_menu(&mut self) -> Result<(), TransitionError> {
        if self.round.is_none() {
            return Err(TransitionError::NoActiveMatch);
        }
        self.timers.cancel_all();
        self.round = None;
        self.end_controls_armed = false;
        self.events.push(GameEvent::ReturnedToMenu);
        info!("Returned to menu");
        Ok(())
    }

    /// Pauses the round. A pending computer move is cancelled.
    #[instrument(skip(self))]
    pub fn pause(&mut self) -> Result<(), TransitionError> {
        let round = self.round.as_mut().ok_or(TransitionError::NoActiveRound)?;
        if round.outcome.is_some() {
            return Err(TransitionError::RoundOver);
        }
        if round.paused {
            return Err(TransitionError::AlreadyPaused);
        }
        round.paused = true;
        self.timers.cancel(TimerKind::ComputerMove);
        self.events.push(GameEvent::Paused);
        debug!("Paused");
        Ok(())
    }

    /// Resumes a paused round, re-arming the computer if it is to move.
    #[instrument(skip(self))]
    pub fn resume(&mut self) -> Result<(), TransitionError> {
        let round = self.round.as_mut().ok_or(TransitionError::NoActiveRound)?;
        if !round.paused {
            return Err(TransitionError::NotPaused);
        }
        round.paused = false;
        let current = round.current;
        self.events.push(GameEvent::Resumed);
        debug!("Resumed");
        if self.is_computer(current) {
            self.arm_computer();
        }
        Ok(())
    }

    /// Activates a control on the end-of-round overlay.
    ///
    /// Returns `Ok(false)` when the controls are not armed yet; the request
    /// is dropped, not queued.
    #[instrument(skip(self))]
    pub fn activate_end_control(&mut self, control: EndControl) -> Result<bool, TransitionError> {
        let round = self.round.as_ref().ok_or(TransitionError::NoActiveMatch)?;
        if round.outcome.is_none() {
            return Err(TransitionError::RoundInProgress);
        }
        if !self.end_controls_armed {
            debug!("End controls not armed; ignoring");
            return Ok(false);
        }
        match control {
            EndControl::PlayAgain => self.next_round().map(|_| true),
            EndControl::MainMenu => self.return_to_menu().map(|_| true),
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Moves
    // ─────────────────────────────────────────────────────────────

    /// Applies a human move at `index` for the mark to move.
    #[instrument(skip(self))]
    pub fn apply_move(&mut self, index: usize) -> Result<Position, MoveError> {
        let round = self.round.as_ref().ok_or(MoveError::NoActiveRound)?;
        if round.paused {
            return Err(MoveError::Paused);
        }
        if round.outcome.is_some() {
            return Err(MoveError::RoundOver);
        }
        if self.is_ai_thinking() {
            return Err(MoveError::ComputerThinking);
        }
        if self.is_computer(round.current) {
            return Err(MoveError::NotYourTurn);
        }
        self.place(index, None)
    }

    /// Input collaborator entry point. Rejections are logged and dropped.
    ///
    /// Returns true if the move was applied.
    #[instrument(skip(self))]
    pub fn report_cell_activation(&mut self, index: usize) -> bool {
        match self.apply_move(index) {
            Ok(_) => true,
            Err(e) => {
                debug!(index, error = %e, "Ignored cell activation");
                false
            }
        }
    }

    /// Fires a timer previously handed out by [`Self::drain_scheduled`].
    ///
    /// Stale and cancelled tokens are ignored. Returns true if the timer
    /// was still armed.
    #[instrument(skip(self))]
    pub fn fire_timer(&mut self, token: TimerToken) -> bool {
        match self.timers.take(token) {
            Some(TimerKind::ComputerMove) => {
                self.play_computer_move();
                true
            }
            Some(TimerKind::EndScreenArm) => {
                self.end_controls_armed = true;
                self.events.push(GameEvent::EndControlsArmed);
                debug!("End controls armed");
                true
            }
            None => {
                trace!(token = token.value(), "Ignoring stale timer");
                false
            }
        }
    }

    fn play_computer_move(&mut self) {
        let Some(comp) = self.mode.and_then(|m| m.computer()) else {
            return;
        };
        let Some(round) = self.round.as_ref() else {
            return;
        };
        if round.paused || round.outcome.is_some() || round.current != comp {
            warn!(current = %round.current, "Computer timer fired out of turn");
            return;
        }
        let decision = choose_move(
            &round.board,
            comp,
            comp.opponent(),
            self.config.profile(),
            &mut self.rng,
        );
        match decision {
            Some(decision) => {
                debug!(position = %decision.position, tier = %decision.tier, "Computer chose move");
                if let Err(e) = self.place(decision.position.to_index(), Some(decision.tier)) {
                    warn!(error = %e, "Computer move rejected");
                }
            }
            None => debug!("Computer has no move"),
        }
    }

    /// Places the current mark and evaluates the round.
    fn place(&mut self, index: usize, tier: Option<Tier>) -> Result<Position, MoveError> {
        let round = self.round.as_mut().ok_or(MoveError::NoActiveRound)?;
        let mark = round.current;
        let placed_at = round.started_at.elapsed().as_millis() as u64;
        let position = round.board.set(index, mark, placed_at)?;
        debug_assert_board(&round.board);
        self.events.push(GameEvent::MovePlaced {
            mark,
            position,
            tier,
        });
        info!(mark = %mark, position = %position, "Move placed");
        self.evaluate();
        Ok(position)
    }

    /// Ends the round on a win or full board, otherwise passes the turn.
    fn evaluate(&mut self) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        let mark = round.current;
        if let Some(line) = find_win_line(&round.board, mark) {
            round.win_line = Some(line);
            round.outcome = Some(Outcome::Winner(mark));
            self.finish_round(Outcome::Winner(mark));
            return;
        }
        if round.board.is_full() {
            round.outcome = Some(Outcome::Draw);
            self.finish_round(Outcome::Draw);
            return;
        }
        let next = mark.opponent();
        round.current = next;
        self.events.push(GameEvent::TurnChanged { mark: next });
        if self.is_computer(next) {
            self.arm_computer();
        }
    }

    fn finish_round(&mut self, outcome: Outcome) {
        self.timers.cancel(TimerKind::ComputerMove);
        self.last_result = Some(outcome);
        match outcome {
            Outcome::Winner(winner) => {
                let score = self.scores.award(winner);
                let event = if self.is_computer(winner) {
                    GameEvent::RoundLost { winner }
                } else {
                    GameEvent::RoundWon { winner }
                };
                self.events.push(event);
                self.events.push(GameEvent::ScoreAwarded {
                    mark: winner,
                    score,
                });
                if score >= *self.config.win_points() {
                    info!(winner = %winner, "Match complete");
                    self.events.push(GameEvent::MatchComplete { winner });
                }
            }
            Outcome::Draw => self.events.push(GameEvent::RoundDraw),
        }
        debug_assert!(self.scores.x + self.scores.o <= self.round_number);
        info!(
            round = self.round_number,
            %outcome,
            x = self.scores.x,
            o = self.scores.o,
            "Round over"
        );
        self.end_controls_armed = false;
        self.timers.arm(TimerKind::EndScreenArm, self.config.end_screen_arm());
    }

    // ─────────────────────────────────────────────────────────────
    //  Rounds and timers
    // ─────────────────────────────────────────────────────────────

    fn reset_round(&mut self, first: Mark) {
        self.timers.cancel_all();
        self.end_controls_armed = false;
        self.round = Some(Round::new(first));
        self.events.push(GameEvent::TurnChanged { mark: first });
        if self.is_computer(first) {
            self.arm_computer();
        }
    }

    fn arm_computer(&mut self) {
        let (min, max) = self.config.profile().delay_range();
        let millis = self
            .rng
            .between(min.as_millis() as f64, max.as_millis() as f64);
        let delay = Duration::from_millis(millis.round() as u64);
        self.timers.arm(TimerKind::ComputerMove, delay);
        self.events.push(GameEvent::ComputerThinking { delay });
    }

    fn is_computer(&self, mark: Mark) -> bool {
        self.mode.is_some_and(|m| m.is_computer(mark))
    }

    /// Drains timers armed since the last call; the driver must run them.
    pub fn drain_scheduled(&mut self) -> Vec<ScheduledTimer> {
        self.timers.drain_scheduled()
    }

    /// Drains events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ─────────────────────────────────────────────────────────────
    //  Snapshots
    // ─────────────────────────────────────────────────────────────

    /// Session configuration.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Mode of the current or last match.
    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    /// Board of the current round.
    pub fn board(&self) -> Option<&Board> {
        self.round.as_ref().map(|r| &r.board)
    }

    /// Mark to move in the current round.
    pub fn current_mark(&self) -> Option<Mark> {
        self.round.as_ref().map(|r| r.current)
    }

    /// Winning line of the finished round.
    pub fn win_line(&self) -> Option<WinLine> {
        self.round.as_ref().and_then(|r| r.win_line)
    }

    /// Match scores.
    pub fn scores(&self) -> Scores {
        self.scores
    }

    /// Round number (0 before the first match).
    pub fn round(&self) -> u32 {
        self.round_number
    }

    /// Result of the most recent finished round.
    pub fn last_result(&self) -> Option<Outcome> {
        self.last_result
    }

    /// True once either score reaches the win threshold.
    pub fn is_match_complete(&self) -> bool {
        self.scores.leader_at(*self.config.win_points()).is_some()
    }

    /// True while the round is paused.
    pub fn is_paused(&self) -> bool {
        self.round.as_ref().is_some_and(|r| r.paused)
    }

    /// True once the round has an outcome.
    pub fn is_game_over(&self) -> bool {
        self.round.as_ref().is_some_and(|r| r.outcome.is_some())
    }

    /// True while a computer move is pending.
    pub fn is_ai_thinking(&self) -> bool {
        self.timers.is_armed(TimerKind::ComputerMove)
    }

    /// True once the end-of-round controls accept input.
    pub fn end_controls_armed(&self) -> bool {
        self.end_controls_armed
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> Phase {
        match &self.round {
            None => Phase::Idle,
            Some(round) => match round.outcome {
                Some(_) if self.is_match_complete() => Phase::MatchOver,
                Some(_) => Phase::RoundOver,
                None if round.paused => Phase::Paused,
                None => Phase::InRound,
            },
        }
    }

    /// HUD turn text; empty when idle, paused or over.
    pub fn turn_label(&self) -> &'static str {
        let (Some(mode), Some(round)) = (self.mode, self.round.as_ref()) else {
            return "";
        };
        if round.paused || round.outcome.is_some() {
            return "";
        }
        match mode {
            Mode::PlayerVsPlayer { player_one } if round.current == player_one => "Player 1 Turn",
            Mode::PlayerVsPlayer { .. } => "Player 2 Turn",
            Mode::PlayerVsComputer { human } if round.current == human => "Your Turn",
            Mode::PlayerVsComputer { .. } => "Computer Turn",
        }
    }

    /// Serializable view of the session.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase(),
            mode: self.mode,
            board: self.board().map(Board::marks).unwrap_or([None; 9]),
            current: self.current_mark(),
            turn_label: self.turn_label().to_string(),
            win_line: self.win_line().map(|l| l.indices()),
            scores: self.scores,
            round: self.round_number,
            last_result: self.last_result,
            ai_thinking: self.is_ai_thinking(),
            end_controls_armed: self.end_controls_armed,
            match_complete: self.is_match_complete(),
        }
    }
}
