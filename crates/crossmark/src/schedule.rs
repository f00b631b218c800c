//! Token-keyed one-shot timers.
//!
//! The session never sleeps. Arming a timer records its token and queues a
//! [`ScheduledTimer`] for whoever drives the clock; that driver hands the
//! token back through `MatchSession::fire_timer` once the delay elapses.
//! Only the currently stored token for a kind is honoured, so cancelling is
//! a matter of forgetting the token.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, trace};

/// Identifies one armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerToken(u64);

impl TimerToken {
    /// Raw token value.
    pub fn value(self) -> u64 {
        self.0
    }
}

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum TimerKind {
    /// Apply the computer's move.
    ComputerMove,
    /// Enable the end-of-round controls.
    EndScreenArm,
}

/// A timer the driver must run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTimer {
    /// Token to hand back when the delay elapses.
    pub token: TimerToken,
    /// Purpose of the timer.
    pub kind: TimerKind,
    /// Delay before firing.
    pub delay: Duration,
}

/// Active timer slots plus the queue of newly armed timers.
#[derive(Debug, Default)]
pub struct Timers {
    next: u64,
    computer: Option<TimerToken>,
    end_screen: Option<TimerToken>,
    pending: Vec<ScheduledTimer>,
}

impl Timers {
    /// Creates an empty timer table.
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, kind: TimerKind) -> &mut Option<TimerToken> {
        match kind {
            TimerKind::ComputerMove => &mut self.computer,
            TimerKind::EndScreenArm => &mut self.end_screen,
        }
    }

    /// Arms a timer of `kind`, replacing any armed timer of the same kind.
    pub fn arm(&mut self, kind: TimerKind, delay: Duration) -> TimerToken {
        self.next += 1;
        let token = TimerToken(self.next);
        *self.slot(kind) = Some(token);
        self.pending.push(ScheduledTimer { token, kind, delay });
        debug!(token = token.0, %kind, delay_ms = delay.as_millis() as u64, "Armed timer");
        token
    }

    /// Forgets the armed timer of `kind`. No-op when none is armed.
    pub fn cancel(&mut self, kind: TimerKind) {
        if let Some(token) = self.slot(kind).take() {
            trace!(token = token.0, %kind, "Cancelled timer");
        }
    }

    /// Forgets every armed timer.
    pub fn cancel_all(&mut self) {
        self.cancel(TimerKind::ComputerMove);
        self.cancel(TimerKind::EndScreenArm);
    }

    /// Returns true if a timer of `kind` is armed.
    pub fn is_armed(&self, kind: TimerKind) -> bool {
        match kind {
            TimerKind::ComputerMove => self.computer.is_some(),
            TimerKind::EndScreenArm => self.end_screen.is_some(),
        }
    }

    /// Consumes `token` if it is the armed token of its kind.
    ///
    /// Returns the kind to act on, or `None` for stale or cancelled tokens.
    pub fn take(&mut self, token: TimerToken) -> Option<TimerKind> {
        [TimerKind::ComputerMove, TimerKind::EndScreenArm]
            .into_iter()
            .find(|&kind| {
                let slot = self.slot(kind);
                if *slot == Some(token) {
                    *slot = None;
                    true
                } else {
                    false
                }
            })
    }

    /// Drains timers armed since the last call.
    pub fn drain_scheduled(&mut self) -> Vec<ScheduledTimer> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_consumes_armed_token_once() {
        let mut timers = Timers::new();
        let token = timers.arm(TimerKind::ComputerMove, Duration::from_millis(500));
        assert_eq!(timers.take(token), Some(TimerKind::ComputerMove));
        assert_eq!(timers.take(token), None);
        assert!(!timers.is_armed(TimerKind::ComputerMove));
    }

    #[test]
    fn test_rearm_makes_previous_token_stale() {
        let mut timers = Timers::new();
        let first = timers.arm(TimerKind::ComputerMove, Duration::from_millis(500));
        let second = timers.arm(TimerKind::ComputerMove, Duration::from_millis(600));
        assert_eq!(timers.take(first), None);
        assert_eq!(timers.take(second), Some(TimerKind::ComputerMove));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut timers = Timers::new();
        let token = timers.arm(TimerKind::EndScreenArm, Duration::from_millis(220));
        timers.cancel(TimerKind::EndScreenArm);
        timers.cancel(TimerKind::EndScreenArm);
        timers.cancel_all();
        assert_eq!(timers.take(token), None);
    }

    #[test]
    fn test_drain_returns_queue_once() {
        let mut timers = Timers::new();
        timers.arm(TimerKind::ComputerMove, Duration::from_millis(1));
        timers.arm(TimerKind::EndScreenArm, Duration::from_millis(2));
        let drained = timers.drain_scheduled();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[1].kind, TimerKind::EndScreenArm);
        assert!(timers.drain_scheduled().is_empty());
    }
}
