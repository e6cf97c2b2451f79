//! Mapping a session view to what the guide draws

use crate::controller::SessionView;

/// Cubic ease-in-out over `[0, 1]`
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Fraction of the current phase already breathed, in `[0, 1]`
///
/// `sub_second` is how far the pending tick has progressed.
pub fn phase_progress(view: &SessionView, sub_second: f64) -> f64 {
    let duration = view.phase.duration() as f64;
    let done = (duration - view.remaining as f64) + sub_second.clamp(0.0, 1.0);
    (done / duration).clamp(0.0, 1.0)
}

/// Circle scale factor for a view
///
/// Each phase eases from the scale the previous phase ended on towards
/// its own target over its whole duration.
pub fn circle_scale(view: &SessionView, sub_second: f64) -> f64 {
    let from = view.phase.previous().spec().scale;
    let to = view.phase.spec().scale;
    let t = ease_in_out(phase_progress(view, sub_second));
    from + (to - from) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::Phase;

    fn view(phase: Phase, remaining: u32) -> SessionView {
        SessionView {
            phase,
            remaining,
            elapsed_total: 0,
            running: true,
        }
    }

    #[test]
    fn test_ease_endpoints() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-9);
        assert!(ease_in_out(0.25) < 0.25);
        assert!(ease_in_out(0.75) > 0.75);
    }

    #[test]
    fn test_inhale_expands() {
        assert!((circle_scale(&view(Phase::Inhale, 4), 0.0) - 0.8).abs() < 1e-9);
        assert!((circle_scale(&view(Phase::Inhale, 1), 1.0) - 1.5).abs() < 1e-9);
        let mid = circle_scale(&view(Phase::Inhale, 2), 0.0);
        assert!(mid > 0.8 && mid < 1.5);
    }

    #[test]
    fn test_exhale_contracts() {
        assert!((circle_scale(&view(Phase::Exhale, 4), 0.0) - 1.5).abs() < 1e-9);
        assert!((circle_scale(&view(Phase::Exhale, 1), 1.0) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_hold_and_rest_are_steady() {
        for remaining in 1..=4 {
            assert!((circle_scale(&view(Phase::Hold, remaining), 0.5) - 1.5).abs() < 1e-9);
        }
        for remaining in 1..=2 {
            assert!((circle_scale(&view(Phase::Rest, remaining), 0.5) - 0.8).abs() < 1e-9);
        }
    }

    #[test]
    fn test_phase_progress() {
        assert_eq!(phase_progress(&view(Phase::Rest, 2), 0.0), 0.0);
        assert_eq!(phase_progress(&view(Phase::Rest, 1), 0.0), 0.5);
        assert_eq!(phase_progress(&view(Phase::Inhale, 1), 0.5), 0.875);
    }
}
