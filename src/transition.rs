//! Smoothed chaos ↔ formed transition.
//!
//! The user toggle flips a [`TreeState`] instantly; the visible animation is
//! driven by a progress scalar that eases towards the state's target by a
//! fixed fraction every rendered frame. One [`TransitionController`] is shared
//! by the foliage and ornament stages so the two never drift apart.

/// The two states of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeState {
    /// Particles scattered through the chaos cloud.
    #[default]
    Chaos,
    /// Particles assembled into the tree.
    Formed,
}

impl TreeState {
    /// Progress value this state pulls towards.
    #[inline]
    pub fn target(self) -> f32 {
        match self {
            TreeState::Chaos => 0.0,
            TreeState::Formed => 1.0,
        }
    }

    /// The other state.
    pub fn toggled(self) -> Self {
        match self {
            TreeState::Chaos => TreeState::Formed,
            TreeState::Formed => TreeState::Chaos,
        }
    }

    /// Short label for window titles and overlays.
    pub fn label(self) -> &'static str {
        match self {
            TreeState::Chaos => "DISPERSED",
            TreeState::Formed => "GRAND FORM",
        }
    }
}

impl From<bool> for TreeState {
    fn from(formed: bool) -> Self {
        if formed {
            TreeState::Formed
        } else {
            TreeState::Chaos
        }
    }
}

/// One smoothing step: move `progress` a fraction `rate` of the way to `target`.
///
/// The result is clamped to `[0, 1]` so float drift can never push the blend
/// outside the two endpoint layouts.
#[inline]
pub fn advance(progress: f32, target: f32, rate: f32) -> f32 {
    let rate = rate.clamp(0.0, 1.0);
    (progress + (target - progress) * rate).clamp(0.0, 1.0)
}

/// Owns the progress scalar for the whole scene.
#[derive(Debug, Clone)]
pub struct TransitionController {
    progress: f32,
    state: TreeState,
    rate: f32,
}

impl TransitionController {
    /// Start dispersed with progress 0.
    pub fn new(rate: f32) -> Self {
        Self {
            progress: 0.0,
            state: TreeState::Chaos,
            rate: rate.clamp(0.0, 1.0),
        }
    }

    /// Current smoothed progress.
    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Requested state.
    #[inline]
    pub fn state(&self) -> TreeState {
        self.state
    }

    /// Per-frame smoothing factor.
    #[inline]
    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Request a state. Progress is untouched until the next [`tick`](Self::tick).
    pub fn set_state(&mut self, state: TreeState) {
        if state != self.state {
            log::info!("Tree state -> {:?} (progress {:.3})", state, self.progress);
        }
        self.state = state;
    }

    /// Flip between chaos and formed, returning the new state.
    pub fn toggle(&mut self) -> TreeState {
        self.set_state(self.state.toggled());
        self.state
    }

    /// Advance one frame and return the new progress.
    pub fn tick(&mut self) -> f32 {
        self.progress = advance(self.progress, self.state.target(), self.rate);
        self.progress
    }

    /// Whether progress is within `epsilon` of the current target.
    pub fn is_settled(&self, epsilon: f32) -> bool {
        (self.progress - self.state.target()).abs() <= epsilon
    }
}

impl Default for TransitionController {
    fn default() -> Self {
        Self::new(crate::config::TreeConfig::DEFAULT_SMOOTHING_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_point() {
        for p in [0.0, 0.25, 0.5, 1.0] {
            assert_eq!(advance(p, p, 0.01), p);
            assert_eq!(advance(p, p, 1.0), p);
        }
    }

    #[test]
    fn test_convergence_is_monotone_and_bounded() {
        let mut p = 0.0;
        let mut last = p;
        for _ in 0..5000 {
            p = advance(p, 1.0, 0.01);
            assert!(p >= last);
            assert!(p <= 1.0);
            last = p;
        }
        assert!(p > 0.9999);
    }

    #[test]
    fn test_rate_is_clamped() {
        assert_eq!(advance(0.2, 1.0, 5.0), 1.0);
        assert_eq!(advance(0.2, 1.0, -1.0), 0.2);
    }

    #[test]
    fn test_progress_clamped_against_bad_input() {
        assert_eq!(advance(1.5, 1.0, 0.0), 1.0);
        assert_eq!(advance(-0.5, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_controller_reverses_smoothly() {
        let mut ctl = TransitionController::new(0.01);
        ctl.set_state(TreeState::Formed);
        for _ in 0..100 {
            ctl.tick();
        }
        let peak = ctl.progress();
        assert!(peak > 0.5 && peak < 0.7);

        ctl.toggle();
        let next = ctl.tick();
        assert!(next < peak);
        // A single step never moves more than `rate` of the remaining distance
        assert!((peak - next) <= peak * 0.01 + 1e-6);
    }

    #[test]
    fn test_controller_settles() {
        let mut ctl = TransitionController::new(0.01);
        assert!(ctl.is_settled(1e-6));
        ctl.set_state(true.into());
        assert!(!ctl.is_settled(0.01));
        for _ in 0..500 {
            ctl.tick();
        }
        assert!(ctl.progress() > 0.99);
        assert!(ctl.is_settled(0.01));
    }

    #[test]
    fn test_state_labels() {
        assert_eq!(TreeState::default(), TreeState::Chaos);
        assert_eq!(TreeState::Chaos.toggled(), TreeState::Formed);
        assert_eq!(TreeState::Formed.target(), 1.0);
        assert_eq!(TreeState::Chaos.label(), "DISPERSED");
    }
}
