//=========================================================================
// Scene Manager
//=========================================================================
//
// Drives the frame loop and mediates transitions between scenes.
//
// Exactly one scene is current at a time. Transitions are two-phase:
// the overlay is shown immediately and the swap (exit old, resolve new,
// enter new, hide overlay) runs once the settle delay has elapsed on the
// frame clock. Every hook and factory call is isolated so a broken scene
// can neither stop the loop nor leave the overlay up.
//
// Re-entrancy: a request made while a swap is pending replaces the
// pending target and keeps the first deadline.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, error, info, trace, warn};

//=== Internal Dependencies ===============================================

use super::transition::PendingTransition;
use super::{
    panic_message, FadeOverlay, Hook, HookResult, Scene, SceneError, SceneKey, SceneRegistry,
    SceneSource, TransitionHandle, TransitionRequest,
};
use crate::core::context::SceneContext;
use crate::core::input::InputEvent;
use crate::core::render::{Camera, Color, Renderer};

//=== Configuration =======================================================

/// Delay between showing the overlay and swapping scenes.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

const MAX_REPORTED_FAILURES: usize = 64;

/// Tunables for a [`SceneManager`].
#[derive(Debug, Clone, PartialEq)]
pub struct ManagerConfig {
    /// Time the overlay stays up before the swap runs.
    pub settle_delay: Duration,

    /// Time the overlay takes to fade fully in or out.
    pub fade_duration: Duration,

    pub overlay_color: Color,

    /// Background used when no scene is current.
    pub clear_color: Color,

    /// Capacity of the cross-thread request channel.
    pub channel_capacity: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            fade_duration: Duration::from_millis(350),
            overlay_color: Color::BLACK,
            clear_color: Color::BLACK,
            channel_capacity: 64,
        }
    }
}

//=== Scene Manager =======================================================

/// Owns the scene registry, the current scene, and the transition
/// machinery.
///
/// # Example
///
/// ```rust
/// # use std::time::Duration;
/// # use ballot_engine::prelude::*;
/// let mut manager: SceneManager<&'static str> =
///     SceneManager::new(Box::new(HeadlessRenderer::new()), Camera::new());
///
/// manager
///     .register_factory("intro", |_ctx| FnScene::new(SceneRoot::new("intro")))
///     .unwrap();
/// manager.start();
/// manager.transition_to("intro").unwrap();
///
/// // The first frame draws the overlay; the swap happens once the settle
/// // delay has elapsed.
/// manager.frame(Duration::from_millis(16));
/// manager.frame(DEFAULT_SETTLE_DELAY);
/// assert_eq!(manager.current_scene(), Some(&"intro"));
/// assert!(!manager.overlay().is_visible());
/// ```
pub struct SceneManager<S: SceneKey> {
    registry: SceneRegistry<S>,
    context: SceneContext<S>,
    current: Option<S>,
    pending: Option<PendingTransition<S>>,
    settle_delay: Duration,
    clear_color: Color,
    running: bool,
    input: Vec<InputEvent>,
    request_tx: Sender<TransitionRequest<S>>,
    request_rx: Receiver<TransitionRequest<S>>,
    failures: VecDeque<SceneError>,
}

impl<S: SceneKey> SceneManager<S> {
    //--- Construction -----------------------------------------------------

    /// Creates a manager around the shared render target and camera with
    /// default settings.
    pub fn new(renderer: Box<dyn Renderer>, camera: Camera) -> Self {
        Self::with_config(renderer, camera, ManagerConfig::default())
    }

    /// Creates a manager with explicit settings.
    ///
    /// # Panics
    ///
    /// Panics if `config.channel_capacity == 0`.
    pub fn with_config(mut renderer: Box<dyn Renderer>, camera: Camera, config: ManagerConfig) -> Self {
        assert!(config.channel_capacity > 0, "Channel capacity must be positive");

        renderer.set_clear_color(config.clear_color);
        let overlay = FadeOverlay::new(config.overlay_color, config.fade_duration);
        let (request_tx, request_rx) = bounded(config.channel_capacity);

        Self {
            registry: SceneRegistry::new(),
            context: SceneContext::with_overlay(renderer, camera, overlay),
            current: None,
            pending: None,
            settle_delay: config.settle_delay,
            clear_color: config.clear_color,
            running: false,
            input: Vec::new(),
            request_tx,
            request_rx,
            failures: VecDeque::new(),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a scene or scene factory under `key`.
    ///
    /// Re-registering a key replaces the entry. If the key is the current
    /// scene, the old instance is exited and the new one is entered behind
    /// the overlay.
    pub fn register(&mut self, key: S, source: SceneSource<S>) -> Result<(), SceneError> {
        if !key.is_valid() {
            return Err(SceneError::InvalidId);
        }

        let replaces_current = self.current.as_ref() == Some(&key);
        if replaces_current {
            warn!("Replacing active scene {:?}", key);
            self.invoke(&key, Hook::Exit, |scene, ctx| scene.on_exit(ctx));
            self.current = None;
        }

        self.registry.register(key.clone(), source)?;

        if replaces_current && self.pending.is_none() {
            self.transition_to(key)?;
        }
        Ok(())
    }

    /// Registers an already-constructed scene.
    pub fn register_scene<T>(&mut self, key: S, scene: T) -> Result<(), SceneError>
    where
        T: Scene<S> + 'static,
    {
        self.register(key, SceneSource::instance(scene))
    }

    /// Registers a factory that builds the scene on its first visit.
    pub fn register_factory<F, T>(&mut self, key: S, factory: F) -> Result<(), SceneError>
    where
        F: FnMut(&mut SceneContext<S>) -> T + 'static,
        T: Scene<S> + 'static,
    {
        self.register(key, SceneSource::factory(factory))
    }

    /// Drops the cached instance of a factory-built scene.
    ///
    /// The current scene cannot be reset.
    pub fn reset_scene(&mut self, key: &S) -> Result<bool, SceneError> {
        if self.current.as_ref() == Some(key) {
            return Err(SceneError::SceneActive(format!("{:?}", key)));
        }
        self.registry.reset(key)
    }

    //--- Loop Control -----------------------------------------------------

    /// Starts the frame loop.
    ///
    /// Returns `false` if it was already running; a second call never
    /// creates a second loop.
    pub fn start(&mut self) -> bool {
        if self.running {
            warn!("Scene manager already running, ignoring start");
            return false;
        }

        info!("Scene manager started with {} registered scenes", self.registry.len());
        self.running = true;
        true
    }

    /// Stops the frame loop. Subsequent frames are ignored.
    pub fn stop(&mut self) {
        debug!("Scene manager stopped");
        self.running = false;
    }

    /// Stops the loop, drops any pending transition, and exits the current
    /// scene.
    pub fn shutdown(&mut self) {
        info!("Shutting down scene manager");
        self.running = false;

        if let Some(pending) = self.pending.take() {
            debug!("Dropping pending transition to {:?}", pending.target());
        }
        if let Some(key) = self.current.take() {
            self.invoke(&key, Hook::Exit, |scene, ctx| scene.on_exit(ctx));
        }
        self.context.overlay.hide();
    }

    //--- Transitions ------------------------------------------------------

    /// Requests a transition to `target`.
    ///
    /// Shows the overlay and schedules the swap after the settle delay. If
    /// a transition is already pending, its target is replaced and its
    /// deadline kept.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NotFound`] for an unregistered target. Nothing
    /// changes in that case.
    pub fn transition_to(&mut self, target: S) -> Result<(), SceneError> {
        if !self.registry.contains(&target) {
            warn!("Transition to unregistered scene {:?} rejected", target);
            return Err(SceneError::not_found(&target));
        }

        match self.pending.as_mut() {
            Some(pending) => {
                let discarded = pending.retarget(target);
                debug!(
                    "Pending transition to {:?} replaced by {:?}",
                    discarded,
                    pending.target()
                );
            }
            None => {
                debug!("Transition to {:?} scheduled in {:?}", target, self.settle_delay);
                self.context.overlay.show();
                self.pending = Some(PendingTransition::new(target, self.settle_delay));
            }
        }
        Ok(())
    }

    /// Returns a cloneable requester usable from other threads.
    pub fn handle(&self) -> TransitionHandle<S> {
        TransitionHandle::new(self.request_tx.clone())
    }

    //--- Frame Loop -------------------------------------------------------

    /// Buffers an input event for the current scene's next frame.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Runs one frame.
    ///
    /// 1. Applies queued transition requests
    /// 2. Performs the pending swap once the settle delay has elapsed and
    ///    the overlay has been drawn in an earlier frame
    /// 3. Steps the current scene: input, `update`, `render`, draw
    /// 4. Advances and draws the overlay
    /// 5. Applies requests raised by scene hooks during this frame
    pub fn frame(&mut self, dt: Duration) {
        if !self.running {
            trace!("Frame ignored, scene manager not running");
            return;
        }

        self.context.time.advance(dt);

        self.process_requests();
        self.advance_transition(dt);
        self.step_current();
        if self.advance_overlay(dt) {
            if let Some(pending) = self.pending.as_mut() {
                pending.mark_presented();
            }
        }
        self.process_requests();
    }

    //--- Queries ----------------------------------------------------------

    pub fn current_scene(&self) -> Option<&S> {
        self.current.as_ref()
    }

    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_target(&self) -> Option<&S> {
        self.pending.as_ref().map(|pending| pending.target())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of frames processed while running.
    pub fn frame_count(&self) -> u64 {
        self.context.time.frame
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    pub fn overlay(&self) -> &FadeOverlay {
        &self.context.overlay
    }

    pub fn context(&self) -> &SceneContext<S> {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut SceneContext<S> {
        &mut self.context
    }

    pub fn registry(&self) -> &SceneRegistry<S> {
        &self.registry
    }

    /// Takes the scene failures reported since the last call.
    pub fn drain_failures(&mut self) -> Vec<SceneError> {
        self.failures.drain(..).collect()
    }

    //--- Internal Helpers -------------------------------------------------

    fn process_requests(&mut self) {
        let remote: Vec<TransitionRequest<S>> = self.request_rx.try_iter().collect();
        let queued = self.context.transitions.take();

        for request in remote.into_iter().chain(queued) {
            if let Err(err) = self.transition_to(request.target) {
                self.report(err);
            }
        }
    }

    fn advance_transition(&mut self, dt: Duration) {
        let due = match self.pending.as_mut() {
            Some(pending) => pending.tick(dt),
            None => false,
        };

        if due {
            if let Some(pending) = self.pending.take() {
                self.swap_to(pending.into_target());
            }
        }
    }

    fn swap_to(&mut self, target: S) {
        if let Some(previous) = self.current.take() {
            debug!("Exiting scene {:?}", previous);
            self.invoke(&previous, Hook::Exit, |scene, ctx| scene.on_exit(ctx));
        }

        let resolved = self.registry.resolve(&target, &mut self.context).map(|_| ());
        match resolved {
            Ok(()) => {
                info!("Entering scene {:?}", target);
                self.current = Some(target.clone());
                self.invoke(&target, Hook::Enter, |scene, ctx| scene.on_enter(ctx));
            }
            Err(err) => self.report(err),
        }

        if !self.input.is_empty() {
            trace!("Dropping {} input events buffered behind the overlay", self.input.len());
            self.input.clear();
        }
        self.context.overlay.hide();
    }

    fn step_current(&mut self) {
        let Some(key) = self.current.clone() else {
            self.input.clear();
            self.context.renderer.set_clear_color(self.clear_color);
            self.context.renderer.clear();
            return;
        };

        let mut events = std::mem::take(&mut self.input);
        if self.context.overlay.is_visible() {
            if !events.is_empty() {
                trace!("Overlay visible, dropping {} input events", events.len());
            }
        } else {
            for event in &events {
                self.invoke(&key, Hook::Input, |scene, ctx| scene.on_input(event, ctx));
            }
        }
        events.clear();
        self.input = events;

        self.invoke(&key, Hook::Update, |scene, ctx| scene.update(ctx));
        self.invoke(&key, Hook::Render, |scene, ctx| scene.render(ctx));

        let ctx = &mut self.context;
        match self.registry.get_mut(&key) {
            Some(scene) => ctx.renderer.draw(scene.root(), &ctx.camera),
            None => ctx.renderer.clear(),
        }
    }

    /// Returns whether the overlay was drawn this frame.
    fn advance_overlay(&mut self, dt: Duration) -> bool {
        let overlay = &mut self.context.overlay;
        overlay.advance(dt);

        let opacity = overlay.opacity();
        if opacity > 0.0 {
            let color = overlay.color();
            self.context.renderer.draw_overlay(color, opacity);
        }
        opacity > 0.0
    }

    /// Calls one hook of a materialized scene in isolation.
    ///
    /// Absent hooks are skipped. Errors and panics are reported, never
    /// propagated.
    fn invoke<F>(&mut self, key: &S, hook: Hook, call: F)
    where
        F: FnOnce(&mut dyn Scene<S>, &mut SceneContext<S>) -> HookResult,
    {
        let Some(scene) = self.registry.get_mut(key) else {
            return;
        };
        if !scene.provides(hook) {
            return;
        }

        let ctx = &mut self.context;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| call(scene, ctx)));

        let reason = match outcome {
            Ok(Ok(())) => return,
            Ok(Err(err)) => format!("{:#}", err),
            Err(payload) => format!("panicked: {}", panic_message(&*payload)),
        };
        self.report(SceneError::HookFailure {
            scene: format!("{:?}", key),
            hook,
            reason,
        });
    }

    fn report(&mut self, err: SceneError) {
        error!("{}", err);
        if self.failures.len() == MAX_REPORTED_FAILURES {
            self.failures.pop_front();
        }
        self.failures.push_back(err);
    }
}

//=========================================================================
// Tests
//=========================================================================
