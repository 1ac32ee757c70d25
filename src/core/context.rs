//=========================================================================
// Scene Context
//=========================================================================
//
// Shared data handed to every scene hook and scene factory.
//
// Contains the process-wide render target and camera (injected once when
// the manager is built), the frame clock, the queue scenes use to request
// transitions, and a read-only view of the transition overlay.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::render::{Camera, Renderer};
use crate::core::scene::{FadeOverlay, SceneKey, TransitionQueue};

//=== FrameTime ===========================================================

/// Timing of the frame currently being processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameTime {
    pub delta: Duration,
    pub elapsed: Duration,
    pub frame: u64,
}

impl FrameTime {
    pub(crate) fn advance(&mut self, delta: Duration) {
        self.delta = delta;
        self.elapsed += delta;
        self.frame += 1;
    }
}

//=== SceneContext ========================================================

/// Shared context available to scenes during their hooks.
///
/// # Available Data
///
/// - `renderer`: shared render target; render state persists across scenes
/// - `camera`: shared camera; scenes frame their own shot in `on_enter`
/// - `transitions`: queue for requesting scene changes
/// - `time()`: frame delta, elapsed time, frame number
/// - `overlay()`: transition overlay state (read-only)
pub struct SceneContext<S: SceneKey> {
    /// Process-wide render target.
    pub renderer: Box<dyn Renderer>,

    /// Process-wide camera.
    pub camera: Camera,

    /// Transition queue for scene changes.
    ///
    /// Scenes queue transitions here during hooks. The scene manager
    /// processes this queue at frame boundaries.
    pub transitions: TransitionQueue<S>,

    pub(crate) time: FrameTime,
    pub(crate) overlay: FadeOverlay,
}

impl<S: SceneKey> SceneContext<S> {
    /// Creates a context around the shared render target and camera.
    pub fn new(renderer: Box<dyn Renderer>, camera: Camera) -> Self {
        Self::with_overlay(renderer, camera, FadeOverlay::new(Default::default(), Duration::ZERO))
    }

    pub(crate) fn with_overlay(
        renderer: Box<dyn Renderer>,
        camera: Camera,
        overlay: FadeOverlay,
    ) -> Self {
        Self {
            renderer,
            camera,
            transitions: TransitionQueue::new(),
            time: FrameTime::default(),
            overlay,
        }
    }

    /// Queues a transition to `target` for the next frame boundary.
    pub fn request_transition(&mut self, target: S) {
        self.transitions.push(target);
    }

    pub fn time(&self) -> FrameTime {
        self.time
    }

    /// Seconds since the previous frame.
    pub fn delta_secs(&self) -> f32 {
        self.time.delta.as_secs_f32()
    }

    pub fn overlay(&self) -> &FadeOverlay {
        &self.overlay
    }

    /// Downcasts the shared renderer to a concrete backend.
    pub fn renderer_as<R: Any>(&self) -> Option<&R> {
        self.renderer.as_any().downcast_ref::<R>()
    }

    /// Mutable variant of [`SceneContext::renderer_as`].
    pub fn renderer_as_mut<R: Any>(&mut self) -> Option<&mut R> {
        self.renderer.as_any_mut().downcast_mut::<R>()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::HeadlessRenderer;

    fn context() -> SceneContext<&'static str> {
        SceneContext::new(Box::new(HeadlessRenderer::new()), Camera::new())
    }

    #[test]
    fn frame_time_accumulates() {
        let mut time = FrameTime::default();
        time.advance(Duration::from_millis(16));
        time.advance(Duration::from_millis(17));

        assert_eq!(time.delta, Duration::from_millis(17));
        assert_eq!(time.elapsed, Duration::from_millis(33));
        assert_eq!(time.frame, 2);
    }

    #[test]
    fn request_transition_queues_target() {
        let mut ctx = context();
        ctx.request_transition("votingBooth");
        assert_eq!(ctx.transitions.take()[0].target, "votingBooth");
    }

    #[test]
    fn renderer_downcast() {
        let mut ctx = context();
        assert!(ctx.renderer_as::<HeadlessRenderer>().is_some());
        assert!(ctx.renderer_as_mut::<HeadlessRenderer>().is_some());
        assert!(ctx.renderer_as::<String>().is_none());
    }

    #[test]
    fn overlay_starts_hidden() {
        let ctx = context();
        assert!(!ctx.overlay().is_visible());
        assert_eq!(ctx.overlay().opacity(), 0.0);
    }
}
