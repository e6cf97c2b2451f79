//! Clock-driven tick source for synchronous event loops
//!
//! The terminal guide polls for input with a timeout and asks the
//! metronome how many ticks fell due since it last looked. The metronome
//! only counts while armed; disarming drops the pending deadline, so no
//! tick can fire after a pause or reset.

use std::time::{Duration, Instant};

/// Source of the current instant
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Shortest period a tick source accepts; shorter periods are raised to it
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Fixed-period deadline tracker
#[derive(Debug, Clone)]
pub struct Metronome {
    period: Duration,
    next_due: Option<Instant>,
}

impl Metronome {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(MIN_PERIOD),
            next_due: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Begin counting; the first tick falls one period after `now`
    pub fn arm(&mut self, now: Instant) {
        if self.next_due.is_none() {
            self.next_due = Some(now + self.period);
        }
    }

    pub fn disarm(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Number of ticks that fell due up to `now`
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(mut due) = self.next_due else {
            return 0;
        };

        let mut fired = 0;
        while due <= now {
            fired += 1;
            due += self.period;
        }
        self.next_due = Some(due);
        fired
    }

    /// Time left until the next tick, if armed
    pub fn until_next(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    /// How far through the current period we are, in `[0, 1]`
    pub fn progress(&self, now: Instant) -> f64 {
        match self.until_next(now) {
            Some(left) => {
                (1.0 - left.as_secs_f64() / self.period.as_secs_f64()).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }
}
