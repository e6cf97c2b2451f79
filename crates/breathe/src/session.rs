//! Single-threaded breathing session
//!
//! Pairs a controller with a metronome so that the metronome is armed
//! exactly while the controller runs.

use std::time::Duration;

use crate::controller::{BreathingController, SessionView, TickOutcome};
use crate::metronome::{Clock, Metronome, SystemClock};
use crate::TICK_PERIOD;

/// A breathing session driven by polling
#[derive(Debug)]
pub struct BreathingSession<C: Clock = SystemClock> {
    controller: BreathingController,
    metronome: Metronome,
    clock: C,
}

impl BreathingSession<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock, TICK_PERIOD)
    }
}

impl Default for BreathingSession<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> BreathingSession<C> {
    pub fn with_clock(clock: C, period: Duration) -> Self {
        Self {
            controller: BreathingController::new(),
            metronome: Metronome::new(period),
            clock,
        }
    }

    pub fn start(&mut self) {
        self.controller.start();
        self.metronome.arm(self.clock.now());
    }

    pub fn pause(&mut self) {
        self.controller.pause();
        self.metronome.disarm();
    }

    pub fn toggle(&mut self) {
        if self.controller.is_running() {
            self.pause();
        } else {
            self.start();
        }
    }

    pub fn reset(&mut self) {
        self.controller.reset();
        self.metronome.disarm();
    }

    /// Apply every tick that fell due since the last call
    pub fn pump(&mut self) -> Vec<TickOutcome> {
        let due = self.metronome.poll(self.clock.now());
        (0..due).map(|_| self.controller.tick()).collect()
    }

    pub fn view(&self) -> SessionView {
        self.controller.view()
    }

    pub fn cycles_completed(&self) -> u64 {
        self.controller.cycles_completed()
    }

    /// How long an event loop may sleep before the next tick is due
    pub fn until_next_tick(&self) -> Option<Duration> {
        self.metronome.until_next(self.clock.now())
    }

    /// Fraction of the current second already elapsed, 0 while paused
    pub fn tick_progress(&self) -> f64 {
        self.metronome.progress(self.clock.now())
    }

    pub fn is_ticking(&self) -> bool {
        self.metronome.is_armed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metronome::testing::ManualClock;
    use crate::phase::Phase;

    const SEC: Duration = Duration::from_secs(1);

    fn session() -> (BreathingSession<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        (BreathingSession::with_clock(clock.clone(), SEC), clock)
    }

    #[test]
    fn test_nothing_happens_before_start() {
        let (mut s, clock) = session();
        clock.advance(Duration::from_secs(30));
        assert!(s.pump().is_empty());
        assert_eq!(s.view().elapsed_total, 0);
        assert!(!s.is_ticking());
    }

    #[test]
    fn test_ticks_follow_the_clock() {
        let (mut s, clock) = session();
        s.start();
        clock.advance(Duration::from_secs(12));
        let outcomes = s.pump();
        assert_eq!(outcomes.len(), 12);

        let v = s.view();
        assert_eq!((v.phase, v.remaining, v.elapsed_total), (Phase::Rest, 2, 12));
    }

    #[test]
    fn test_pause_releases_the_timer() {
        let (mut s, clock) = session();
        s.start();
        clock.advance(Duration::from_secs(5));
        s.pump();
        s.pause();
        assert!(!s.is_ticking());

        let before = s.view();
        clock.advance(Duration::from_secs(60));
        assert!(s.pump().is_empty());
        assert_eq!(s.view(), before);
    }

    #[test]
    fn test_reset_releases_the_timer() {
        let (mut s, clock) = session();
        s.start();
        clock.advance(Duration::from_secs(9));
        s.pump();
        s.reset();
        assert!(!s.is_ticking());
        clock.advance(Duration::from_secs(9));
        assert!(s.pump().is_empty());

        let v = s.view();
        assert_eq!((v.running, v.phase, v.remaining, v.elapsed_total), (false, Phase::Inhale, 4, 0));
    }

    #[test]
    fn test_toggle_resumes_where_it_paused() {
        let (mut s, clock) = session();
        s.toggle();
        clock.advance(Duration::from_secs(3));
        s.pump();
        s.toggle();
        clock.advance(Duration::from_secs(100));
        s.toggle();
        clock.advance(Duration::from_secs(1));
        s.pump();

        let v = s.view();
        assert_eq!((v.phase, v.remaining, v.elapsed_total), (Phase::Hold, 4, 4));
    }

    #[test]
    fn test_zero_period_still_returns() {
        let clock = ManualClock::new();
        let mut s = BreathingSession::with_clock(clock.clone(), Duration::ZERO);
        s.start();
        clock.advance(Duration::from_millis(14));
        assert_eq!(s.pump().len(), 14);

        let v = s.view();
        assert_eq!((v.phase, v.remaining, v.elapsed_total), (Phase::Inhale, 4, 14));
    }

    #[test]
    fn test_until_next_tick() {
        let (mut s, clock) = session();
        assert_eq!(s.until_next_tick(), None);
        s.start();
        clock.advance(Duration::from_millis(300));
        assert_eq!(s.until_next_tick(), Some(Duration::from_millis(700)));
    }
}
