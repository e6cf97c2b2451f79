//! breathe - Guided breathing in the terminal
//!
//! "Four in, four held, four out, two at rest."
//!
//! The core is a countdown state machine over a fixed phase table:
//! - Inhale 4s, Hold 4s, Exhale 4s, Rest 2s, repeating every 14 seconds
//! - start / pause / reset / tick, plus a read-only view for rendering
//!
//! The controller never owns a timer. Two drivers supply ticks:
//! - [`BreathingSession`]: polled by a synchronous event loop (the TUI)
//! - [`Breather`]: a tokio interval task for headless runs

use std::time::Duration;

pub mod controller;
pub mod metronome;
pub mod phase;
pub mod render;
pub mod session;
pub mod ticker;

pub use controller::{BreathingController, SessionView, TickOutcome};
pub use metronome::{Clock, Metronome, SystemClock, MIN_PERIOD};
pub use phase::Phase;
pub use session::BreathingSession;
pub use ticker::{Breather, PhaseTicker, SharedController, TickEvent};

/// One tick per second of wall-clock time
pub const TICK_PERIOD: Duration = Duration::from_secs(1);
