//=========================================================================
// Transition State
//=========================================================================
//
// Timing pieces of a scene transition.
//
// - `PendingTransition`: the deferred swap. It counts down the settle
//   delay on the frame clock instead of sleeping, so the frame loop keeps
//   running (and keeps drawing the outgoing scene) while it waits. It
//   never fires before a frame has been drawn under the overlay, even if
//   a single long frame covers the whole delay.
// - `FadeOverlay`: the full-screen layer that masks the swap. The
//   manager shows it when a transition is requested and hides it once
//   the incoming scene has been entered; its opacity eases toward the
//   requested state over the fade duration.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== Internal Dependencies ===============================================

use super::SceneKey;
use crate::core::render::Color;

//=== Easing ==============================================================

/// Acceleration curve for the overlay fade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Easing {
    /// Constant speed throughout.
    Linear,
    /// Start slow, accelerate.
    EaseIn,
    /// Start fast, decelerate.
    EaseOut,
    /// Start slow, speed up, then slow down.
    #[default]
    EaseInOut,
}

impl Easing {
    /// Apply the easing function to a linear progress value (0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

//=== Pending Transition ==================================================

/// A scheduled scene swap waiting out the settle delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingTransition<S: SceneKey> {
    target: S,
    remaining: Duration,
    presented: bool,
}

impl<S: SceneKey> PendingTransition<S> {
    pub(crate) fn new(target: S, delay: Duration) -> Self {
        Self {
            target,
            remaining: delay,
            presented: false,
        }
    }

    pub(crate) fn target(&self) -> &S {
        &self.target
    }

    #[cfg(test)]
    pub(crate) fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Points the swap at a new target without touching the deadline.
    ///
    /// Returns the discarded target.
    pub(crate) fn retarget(&mut self, target: S) -> S {
        std::mem::replace(&mut self.target, target)
    }

    /// Records that a frame has drawn with the overlay up.
    pub(crate) fn mark_presented(&mut self) {
        self.presented = true;
    }

    /// Advances the countdown. Returns true once the delay has elapsed and
    /// the overlay has been on screen for at least one frame.
    pub(crate) fn tick(&mut self, dt: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(dt);
        self.presented && self.remaining.is_zero()
    }

    pub(crate) fn into_target(self) -> S {
        self.target
    }
}

//=== Fade Overlay ========================================================

/// Full-screen overlay that masks scene swaps.
///
/// Owned by the scene manager. Scenes can observe it through
/// [`SceneContext::overlay`](crate::core::context::SceneContext::overlay)
/// but cannot show or hide it.
#[derive(Debug, Clone, PartialEq)]
pub struct FadeOverlay {
    visible: bool,
    progress: f32,
    fade: Duration,
    color: Color,
    easing: Easing,
}

impl FadeOverlay {
    pub fn new(color: Color, fade: Duration) -> Self {
        Self {
            visible: false,
            progress: 0.0,
            fade,
            color,
            easing: Easing::default(),
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Whether the overlay is shown (blocking input, masking the swap).
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Current eased opacity in `[0, 1]`.
    pub fn opacity(&self) -> f32 {
        self.easing.apply(self.progress)
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn fade_duration(&self) -> Duration {
        self.fade
    }

    /// Whether the fade has reached the shown/hidden state.
    pub fn is_settled(&self) -> bool {
        let goal = if self.visible { 1.0 } else { 0.0 };
        self.progress == goal
    }

    pub(crate) fn show(&mut self) {
        self.visible = true;
    }

    pub(crate) fn hide(&mut self) {
        self.visible = false;
    }

    /// Moves the fade toward the shown/hidden state.
    pub(crate) fn advance(&mut self, dt: Duration) {
        let goal = if self.visible { 1.0 } else { 0.0 };
        if self.fade.is_zero() {
            self.progress = goal;
            return;
        }

        let step = dt.as_secs_f32() / self.fade.as_secs_f32();
        self.progress = if self.visible {
            (self.progress + step).min(goal)
        } else {
            (self.progress - step).max(goal)
        };
    }
}

//=========================================================================
// Tests
//=========================================================================
