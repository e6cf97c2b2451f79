//! Breathing cycle controller
//!
//! A countdown state machine over the phase table. The controller never
//! owns a timer: whoever drives it calls [`BreathingController::tick`]
//! once per second while it is running.

use serde::Serialize;
use tracing::debug;

use crate::phase::Phase;

/// Snapshot of the session for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub phase: Phase,
    /// Seconds left in the current phase, in `[1, phase.duration()]`
    pub remaining: u32,
    /// Seconds of breathing since the last reset
    pub elapsed_total: u64,
    pub running: bool,
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running; nothing changed
    Idle,
    /// Countdown decremented within the same phase
    Counted { remaining: u32 },
    /// Countdown expired and the next phase began
    Advanced { from: Phase, to: Phase },
}

/// Runtime state of one breathing session
#[derive(Debug, Clone)]
pub struct BreathingController {
    running: bool,
    phase: Phase,
    remaining: u32,
    elapsed_total: u64,
    cycles_completed: u64,
}

impl Default for BreathingController {
    fn default() -> Self {
        Self::new()
    }
}

impl BreathingController {
    pub fn new() -> Self {
        Self {
            running: false,
            phase: Phase::Inhale,
            remaining: Phase::Inhale.duration(),
            elapsed_total: 0,
            cycles_completed: 0,
        }
    }

    pub fn start(&mut self) {
        if !self.running {
            debug!(phase = self.phase.as_str(), remaining = self.remaining, "breathing started");
            self.running = true;
        }
    }

    /// Stop counting, keeping phase, countdown and elapsed time
    pub fn pause(&mut self) {
        if self.running {
            debug!(phase = self.phase.as_str(), remaining = self.remaining, "breathing paused");
            self.running = false;
        }
    }

    /// Start if paused, pause if running
    pub fn toggle(&mut self) {
        if self.running {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Return to the initial state: paused, Inhale, full countdown, zero elapsed
    pub fn reset(&mut self) {
        debug!(elapsed = self.elapsed_total, "breathing reset");
        *self = Self::new();
    }

    /// Advance the session by one second
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }

        let outcome = if self.remaining > 1 {
            self.remaining -= 1;
            TickOutcome::Counted {
                remaining: self.remaining,
            }
        } else {
            let from = self.phase;
            let to = from.next();
            self.phase = to;
            self.remaining = to.duration();
            if to == Phase::Inhale {
                self.cycles_completed += 1;
            }
            debug!(from = from.as_str(), to = to.as_str(), "phase changed");
            TickOutcome::Advanced { from, to }
        };

        self.elapsed_total += 1;
        outcome
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            phase: self.phase,
            remaining: self.remaining,
            elapsed_total: self.elapsed_total,
            running: self.running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of full cycles (Rest -> Inhale transitions) since the last reset
    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }
}
