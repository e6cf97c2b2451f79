//! Breathing phases and the static phase table
//!
//! One cycle is Inhale (4s) -> Hold (4s) -> Exhale (4s) -> Rest (2s),
//! fourteen seconds in total, repeating forever.

use serde::{Deserialize, Serialize};

/// A stage of the breathing cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Inhale,
    Hold,
    Exhale,
    Rest,
}

/// Visual palette of a phase, as a gradient from one hue to another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub from: &'static str,
    pub to: &'static str,
}

/// Fixed attributes of a phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseSpec {
    /// Duration in whole seconds
    pub duration: u32,
    /// Phase entered when this one expires
    pub next: Phase,
    /// Text shown while the phase is active
    pub label: &'static str,
    /// Circle scale the phase animates towards
    pub scale: f64,
    pub palette: Palette,
}

const INHALE: PhaseSpec = PhaseSpec {
    duration: 4,
    next: Phase::Hold,
    label: "Breathe In",
    scale: 1.5,
    palette: Palette { from: "teal", to: "cyan" },
};

const HOLD: PhaseSpec = PhaseSpec {
    duration: 4,
    next: Phase::Exhale,
    label: "Hold",
    scale: 1.5,
    palette: Palette { from: "blue", to: "indigo" },
};

const EXHALE: PhaseSpec = PhaseSpec {
    duration: 4,
    next: Phase::Rest,
    label: "Breathe Out",
    scale: 0.8,
    palette: Palette { from: "purple", to: "pink" },
};

const REST: PhaseSpec = PhaseSpec {
    duration: 2,
    next: Phase::Inhale,
    label: "Rest",
    scale: 0.8,
    palette: Palette { from: "violet", to: "purple" },
};

impl Phase {
    /// All phases in cycle order, starting at Inhale
    pub const ALL: [Phase; 4] = [Phase::Inhale, Phase::Hold, Phase::Exhale, Phase::Rest];

    /// Look up this phase's row in the phase table
    pub fn spec(&self) -> &'static PhaseSpec {
        match self {
            Phase::Inhale => &INHALE,
            Phase::Hold => &HOLD,
            Phase::Exhale => &EXHALE,
            Phase::Rest => &REST,
        }
    }

    pub fn duration(&self) -> u32 {
        self.spec().duration
    }

    pub fn next(&self) -> Phase {
        self.spec().next
    }

    /// The phase that hands over to this one
    pub fn previous(&self) -> Phase {
        match self {
            Phase::Inhale => Phase::Rest,
            Phase::Hold => Phase::Inhale,
            Phase::Exhale => Phase::Hold,
            Phase::Rest => Phase::Exhale,
        }
    }

    pub fn label(&self) -> &'static str {
        self.spec().label
    }

    /// Whether the breathing circle is expanded during this phase
    pub fn is_expanded(&self) -> bool {
        matches!(self, Phase::Inhale | Phase::Hold)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Inhale => "inhale",
            Phase::Hold => "hold",
            Phase::Exhale => "exhale",
            Phase::Rest => "rest",
        }
    }
}

/// Length of one full cycle in seconds
pub fn cycle_seconds() -> u32 {
    Phase::ALL.iter().map(|p| p.duration()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_table() {
        assert_eq!(Phase::Inhale.duration(), 4);
        assert_eq!(Phase::Hold.duration(), 4);
        assert_eq!(Phase::Exhale.duration(), 4);
        assert_eq!(Phase::Rest.duration(), 2);

        assert_eq!(Phase::Inhale.next(), Phase::Hold);
        assert_eq!(Phase::Hold.next(), Phase::Exhale);
        assert_eq!(Phase::Exhale.next(), Phase::Rest);
        assert_eq!(Phase::Rest.next(), Phase::Inhale);
    }

    #[test]
    fn test_cycle_is_fourteen_seconds() {
        assert_eq!(cycle_seconds(), 14);
    }

    #[test]
    fn test_previous_inverts_next() {
        for phase in Phase::ALL {
            assert_eq!(phase.next().previous(), phase);
        }
    }

    #[test]
    fn test_expanded_phases() {
        assert!(Phase::Inhale.is_expanded());
        assert!(Phase::Hold.is_expanded());
        assert!(!Phase::Exhale.is_expanded());
        assert!(!Phase::Rest.is_expanded());
        assert_eq!(Phase::Hold.spec().scale, 1.5);
        assert_eq!(Phase::Rest.spec().scale, 0.8);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Phase::Inhale.label(), "Breathe In");
        assert_eq!(Phase::Exhale.label(), "Breathe Out");
    }
}
