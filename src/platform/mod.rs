//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the scene manager.
//
// Architecture:
// ```text
//  Main Thread:
//  ┌──────────────────────────────────────────────┐
//  │  Winit Event Loop                            │
//  │   ↓                                          │
//  │  InputProcessor                              │
//  │   ├─ Converts Winit → InputEvent             │
//  │   └─ Tracks cursor position                  │
//  │   ↓                                          │
//  │  SceneManager::push_input (buffered)         │
//  │   ↓                                          │
//  │  RedrawRequested                             │
//  │   ↓ (frame boundary)                         │
//  │  SceneManager::frame(dt) → request_redraw()  │
//  └──────────────────────────────────────────────┘
//         ↑
//   TransitionHandle (any thread, bounded channel)
// ```
//
// Key Design Decisions:
// - **RedrawRequested = frame boundary**: Input buffered between redraws
//   is delivered to the current scene in arrival order on the next frame
// - **Frame delta from wall clock**: The first frame after the window
//   appears has a zero delta; every later one measures since the previous
// - **Resize forwarding**: Surface size changes update the shared camera
//   aspect and the renderer
// - **Main thread requirement**: Winit mandates main thread on macOS/iOS,
//   so this runs on the thread that called `Engine::run()`
//
//=========================================================================

//=== Submodules ==========================================================

mod input_processor;

//=== External Crates =====================================================

use std::time::Instant;

use log::*;
use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    error::EventLoopError,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes},
};

//=== Internal Imports ====================================================

use crate::core::scene::{SceneKey, SceneManager};
use input_processor::InputProcessor;

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
///
/// These are typically fatal - if the event loop can't be created,
/// the engine cannot run.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Failed to create event loop (rare, indicates OS-level issue).
    #[error("Event loop creation failed: {0}")]
    EventLoopCreation(#[source] EventLoopError),

    /// Event loop execution error (rare, indicates corruption).
    #[error("Event loop error: {0}")]
    EventLoopExecution(#[source] EventLoopError),
}

//=== WindowConfig ========================================================

/// Attributes of the window created on `resumed()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WindowConfig {
    pub(crate) title: String,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

//=== Platform ============================================================

/// Window owner and frame driver.
///
/// # Lifecycle
///
/// 1. **Construction**: `Platform::new(manager, config)`
/// 2. **Execution**: `platform.run()` - blocks in the event loop
/// 3. **Event processing**: Winit calls `ApplicationHandler` methods
/// 4. **Shutdown**: User closes window → manager shut down → loop exits
///
/// # Thread Safety
///
/// This type is NOT Send/Sync - it must remain on the main thread.
/// Other threads reach the manager only through a `TransitionHandle`.
pub(crate) struct Platform<S: SceneKey> {
    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,

    window_config: WindowConfig,

    manager: SceneManager<S>,

    /// Timestamp of the previous frame (None before the first one).
    last_frame: Option<Instant>,

    /// Converts Winit events to engine InputEvents.
    input_processor: InputProcessor,
}

impl<S: SceneKey> Platform<S> {
    //--- Construction -----------------------------------------------------

    /// Creates a new platform around a started scene manager.
    ///
    /// Does not create window yet - that happens lazily in `resumed()`.
    pub fn new(manager: SceneManager<S>, window_config: WindowConfig) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            window_config,
            manager,
            last_frame: None,
            input_processor: InputProcessor::new(),
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the event loop until the window is closed.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while running.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread (macOS/iOS Winit requirement).
    pub fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new()
            .map_err(PlatformError::EventLoopCreation)?;

        event_loop.run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)
    }

    //--- Internal Helpers -------------------------------------------------

    /// Runs one manager frame with the wall-clock delta since the last.
    fn tick(&mut self, now: Instant) {
        let dt = match self.last_frame {
            Some(previous) => now.saturating_duration_since(previous),
            None => Default::default(),
        };
        self.last_frame = Some(now);

        trace!(target: "platform", "Frame {} (dt: {:?})", self.manager.frame_count() + 1, dt);
        self.manager.frame(dt);
    }

    /// Forwards a surface size change to the shared camera and renderer.
    fn resize(&mut self, width: u32, height: u32) {
        debug!(target: "platform", "Surface resized to {}x{}", width, height);
        let ctx = self.manager.context_mut();
        ctx.camera.set_aspect(width, height);
        ctx.renderer.resize(width, height);
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== Winit Integration ===================================================

impl<S: SceneKey> ApplicationHandler for Platform<S> {
    /// Called when app becomes active (startup or mobile resume).
    ///
    /// Creates the window if it doesn't exist yet. On mobile, this may be
    /// called multiple times (suspend/resume cycle).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.window_config.title.clone())
            .with_inner_size(LogicalSize::new(
                self.window_config.width,
                self.window_config.height,
            ));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                let size = window.inner_size();
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    size.width,
                    size.height,
                    window.scale_factor()
                );
                self.resize(size.width, size.height);
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.manager.shutdown();
                event_loop.exit();
            }
        }
    }

    /// Handles per-window events.
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.manager.shutdown();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                self.resize(size.width, size.height);
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = self.input_processor.process_mouse_move(
                    position.x as f32,
                    position.y as f32
                );
                self.manager.push_input(event);
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if let Some(event) = self.input_processor.process_key_event(key_event) {
                    self.manager.push_input(event);
                } else {
                    trace!(target: "platform::input", "Unmapped key ignored");
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.input_processor.process_mouse_button(*button, *state);
                self.manager.push_input(event);
            }

            WindowEvent::RedrawRequested => {
                // Frame boundary: run the manager with buffered input
                self.tick(Instant::now());

                // Request next frame
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {
                // Ignore: Focused, ScaleFactorChanged, etc.
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;
    use crate::core::input::{InputEvent, KeyCode};
    use crate::core::render::{Camera, HeadlessRenderer, SceneRoot};
    use crate::core::scene::FnScene;

    fn platform() -> Platform<&'static str> {
        let mut manager =
            SceneManager::new(Box::new(HeadlessRenderer::new()), Camera::new());
        manager.start();

        let config = WindowConfig {
            title: "Test".to_owned(),
            width: 640,
            height: 480,
        };
        Platform::new(manager, config)
    }

    //=====================================================================
    // Platform Tests
    //=====================================================================

    #[test]
    fn platform_creation() {
        let platform = platform();
        assert!(platform.window().is_none(), "Window should be created lazily");
    }

    #[test]
    fn first_tick_has_zero_delta() {
        let mut platform = platform();

        platform.tick(Instant::now());

        assert_eq!(platform.manager.frame_count(), 1);
        assert_eq!(platform.manager.context().time().delta, Duration::ZERO);
    }

    #[test]
    fn later_ticks_measure_wall_clock() {
        let mut platform = platform();
        let start = Instant::now();

        platform.tick(start);
        platform.tick(start + Duration::from_millis(16));

        assert_eq!(platform.manager.context().time().delta, Duration::from_millis(16));
        assert_eq!(platform.manager.context().time().elapsed, Duration::from_millis(16));
    }

    #[test]
    fn tick_drives_pending_transition() {
        let mut platform = platform();
        platform
            .manager
            .register_scene("intro", FnScene::new(SceneRoot::new("intro")))
            .unwrap();
        platform.manager.transition_to("intro").unwrap();

        let start = Instant::now();
        platform.tick(start);
        assert!(platform.manager.is_transitioning());

        // The zero-delta first frame leaves the fade at zero opacity, so
        // the swap waits for a frame that actually draws the overlay.
        platform.tick(start + Duration::from_secs(1));
        assert_eq!(platform.manager.current_scene(), None);

        platform.tick(start + Duration::from_millis(1016));
        assert_eq!(platform.manager.current_scene(), Some(&"intro"));
    }

    #[test]
    fn resize_updates_camera_and_renderer() {
        let mut platform = platform();

        platform.resize(800, 400);

        let ctx = platform.manager.context();
        assert_eq!(ctx.camera.aspect, 2.0);
        let renderer = ctx.renderer_as::<HeadlessRenderer>().unwrap();
        assert_eq!(renderer.size(), (800, 400));
    }

    #[test]
    fn input_is_forwarded_to_manager() {
        let mut platform = platform();
        let pressed = Rc::new(Cell::new(false));
        let seen = Rc::clone(&pressed);

        let booth: FnScene<&'static str> =
            FnScene::new(SceneRoot::new("booth")).with_input(move |_root, event, _ctx| {
                if event.is_press_of(KeyCode::Digit1) {
                    seen.set(true);
                }
                Ok(())
            });
        platform.manager.register_scene("booth", booth).unwrap();
        platform.manager.transition_to("booth").unwrap();

        let start = Instant::now();
        platform.tick(start);
        platform.tick(start + Duration::from_secs(1));
        platform.tick(start + Duration::from_secs(2));

        platform
            .manager
            .push_input(InputEvent::KeyPressed { key: KeyCode::Digit1, repeat: false });
        platform.tick(start + Duration::from_secs(3));

        assert!(pressed.get());
    }

    //=====================================================================
    // PlatformError Tests
    //=====================================================================

    #[test]
    fn platform_error_is_error_trait() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<PlatformError>();
    }
}
