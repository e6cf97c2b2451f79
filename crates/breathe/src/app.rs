//! Guide state

use breathe::{BreathingSession, TickOutcome};
use haven_core::Config;
use tracing::debug;

/// Interactive guide: a session plus view toggles
pub struct App {
    pub session: BreathingSession,
    pub show_help: bool,
    pub show_benefits: bool,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self {
            session: BreathingSession::new(),
            show_help: false,
            show_benefits: config.show_benefits,
        }
    }

    /// The single play/pause control
    pub fn toggle(&mut self) {
        self.session.toggle();
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Apply ticks that fell due since the last frame
    pub fn update(&mut self) {
        for outcome in self.session.pump() {
            if let TickOutcome::Advanced { from, to } = outcome {
                debug!(
                    from = from.as_str(),
                    to = to.as_str(),
                    cycles = self.session.cycles_completed(),
                    "guide phase change"
                );
            }
        }
    }
}
