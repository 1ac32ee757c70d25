//=========================================================================
// Ballot Engine
//
// Main entry point and coordinator for the engine.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──init()──>  Engine  ──run()──>  [Runtime]
//         │                          │                                        │
//         ├─ with_settle_delay()     └─ owns SceneManager                     ├─ starts manager
//         ├─ with_fade_duration()       (renderer + camera injected)          └─ runs platform
//         ├─ with_renderer()                                                     blocks until exit
//         └─ with_window_*()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::{error, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::render::{Camera, Color, HeadlessRenderer, Renderer};
use crate::core::scene::{ManagerConfig, SceneKey, SceneManager, TransitionHandle};
use crate::platform::{Platform, PlatformError, WindowConfig};

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Settle delay**: 1 s (overlay up before the swap)
/// - **Fade duration**: 350 ms
/// - **Channel capacity**: 64 transition requests
/// - **Window**: "Election Night", 1280x720
/// - **Renderer**: [`HeadlessRenderer`]
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use ballot_engine::prelude::*;
///
/// EngineBuilder::<&'static str>::new()
///     .with_settle_delay(Duration::from_millis(500))
///     .with_window_title("Ballot")
///     .build()
///     .init(|manager| {
///         manager
///             .register_factory("intro", |_ctx| FnScene::new(SceneRoot::new("intro")))
///             .unwrap();
///         manager.transition_to("intro").unwrap();
///     })
///     .run()
///     .unwrap();
/// ```
pub struct EngineBuilder<S: SceneKey> {
    settle_delay: Duration,
    fade_duration: Duration,
    overlay_color: Color,
    clear_color: Color,
    channel_capacity: usize,
    camera: Camera,
    renderer: Option<Box<dyn Renderer>>,
    window_title: String,
    window_size: (u32, u32),
    _phantom: std::marker::PhantomData<S>,
}

impl<S: SceneKey> EngineBuilder<S> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        let defaults = ManagerConfig::default();
        Self {
            settle_delay: defaults.settle_delay,
            fade_duration: defaults.fade_duration,
            overlay_color: defaults.overlay_color,
            clear_color: defaults.clear_color,
            channel_capacity: defaults.channel_capacity,
            camera: Camera::new(),
            renderer: None,
            window_title: "Election Night".to_owned(),
            window_size: (1280, 720),
            _phantom: std::marker::PhantomData,
        }
    }

    /// Sets how long the overlay stays up before scenes are swapped.
    ///
    /// Default: 1 s
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Sets how long the overlay takes to fade in or out.
    ///
    /// Default: 350 ms. Clamped to the settle delay at build time.
    pub fn with_fade_duration(mut self, fade: Duration) -> Self {
        self.fade_duration = fade;
        self
    }

    pub fn with_overlay_color(mut self, color: Color) -> Self {
        self.overlay_color = color;
        self
    }

    /// Background used while no scene is current.
    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Sets the initial shared camera.
    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self
    }

    /// Sets the shared render target.
    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_window_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }

    /// Sets the initial window size in logical pixels.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Window size must be positive, got {}x{}", width, height);
        self.window_size = (width, height);
        self
    }

    /// Sets the capacity of the cross-thread transition request channel.
    ///
    /// Default: 64
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Builds the engine instance.
    ///
    /// Consumes the builder and produces an [`Engine`] whose scene manager
    /// owns the configured renderer and camera. Register scenes with
    /// [`Engine::init`], then call [`Engine::run`].
    pub fn build(self) -> Engine<S> {
        info!(
            "Building engine (settle: {:?}, fade: {:?}, channel: {})",
            self.settle_delay, self.fade_duration, self.channel_capacity
        );

        let fade_duration = if self.fade_duration > self.settle_delay {
            warn!(
                "Fade duration {:?} exceeds settle delay {:?}, clamping",
                self.fade_duration, self.settle_delay
            );
            self.settle_delay
        } else {
            self.fade_duration
        };

        let config = ManagerConfig {
            settle_delay: self.settle_delay,
            fade_duration,
            overlay_color: self.overlay_color,
            clear_color: self.clear_color,
            channel_capacity: self.channel_capacity,
        };
        let renderer: Box<dyn Renderer> = match self.renderer {
            Some(renderer) => renderer,
            None => Box::new(HeadlessRenderer::new()),
        };

        Engine {
            manager: SceneManager::with_config(renderer, self.camera, config),
            window: WindowConfig {
                title: self.window_title,
                width: self.window_size.0,
                height: self.window_size.1,
            },
        }
    }
}

impl<S: SceneKey> Default for EngineBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Ballot engine runtime.
///
/// Create via [`EngineBuilder`] with `EngineBuilder::new().build()`.
///
/// # Architecture
///
/// ```text
/// Engine (Main Thread)
///   └─► Platform (Winit event loop)
///         ├─► Window, input conversion
///         └─► SceneManager::frame(dt) on every redraw
///               └─► current Scene hooks
///
/// Other threads: TransitionHandle (bounded channel)
/// ```
pub struct Engine<S: SceneKey> {
    manager: SceneManager<S>,
    window: WindowConfig,
}

impl<S: SceneKey> Engine<S> {
    //--- Initialization ---------------------------------------------------

    /// Configures the scene manager before execution.
    ///
    /// Register scenes and request the first transition here.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use ballot_engine::prelude::*;
    /// EngineBuilder::<&'static str>::new()
    ///     .build()
    ///     .init(|manager| {
    ///         manager
    ///             .register_scene("votingBooth", FnScene::new(SceneRoot::new("booth")))
    ///             .unwrap();
    ///         manager.transition_to("votingBooth").unwrap();
    ///     })
    ///     .run()
    ///     .unwrap();
    /// ```
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut SceneManager<S>),
    {
        info!("Initializing engine scenes");

        init_fn(&mut self.manager);

        info!(
            "Engine initialization complete ({} scenes registered)",
            self.manager.registry().len()
        );
        self
    }

    /// Returns a requester that can trigger transitions from other threads.
    pub fn transition_handle(&self) -> TransitionHandle<S> {
        self.manager.handle()
    }

    //--- Execution --------------------------------------------------------

    /// Starts the frame loop and blocks until the window is closed.
    ///
    /// # Lifecycle
    ///
    /// 1. Starts the scene manager (idempotent)
    /// 2. Runs the platform event loop (blocks here)
    /// 3. On window close: current scene exited, loop stopped, event loop exits
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or fails.
    pub fn run(mut self) -> Result<(), PlatformError> {
        info!("Starting engine runtime");

        //--- 1. Start the frame loop --------------------------------------
        self.manager.start();

        //--- 2. Launch the platform subsystem -----------------------------
        let platform = Platform::new(self.manager, self.window);
        info!("Platform initialized, entering event loop");

        let result = platform.run();
        if let Err(e) = &result {
            error!("Platform error: {}", e);
        }

        info!("Engine shutdown complete");
        result
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::SceneRoot;
    use crate::core::scene::FnScene;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestScene {
        Intro,
        Booth,
    }

    impl SceneKey for TestScene {}

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::<TestScene>::new();
        assert_eq!(builder.settle_delay, Duration::from_secs(1));
        assert_eq!(builder.fade_duration, Duration::from_millis(350));
        assert_eq!(builder.channel_capacity, 64);
        assert_eq!(builder.window_title, "Election Night");
        assert_eq!(builder.window_size, (1280, 720));
        assert!(builder.renderer.is_none());
    }

    #[test]
    fn builder_with_settle_delay() {
        let builder =
            EngineBuilder::<TestScene>::new().with_settle_delay(Duration::from_millis(250));
        assert_eq!(builder.settle_delay, Duration::from_millis(250));
    }

    #[test]
    fn build_clamps_fade_to_settle_delay() {
        let engine = EngineBuilder::<TestScene>::new()
            .with_settle_delay(Duration::from_millis(200))
            .build();

        assert_eq!(engine.manager.overlay().fade_duration(), Duration::from_millis(200));
    }

    #[test]
    fn builder_with_channel_capacity() {
        let builder = EngineBuilder::<TestScene>::new().with_channel_capacity(256);
        assert_eq!(builder.channel_capacity, 256);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        EngineBuilder::<TestScene>::new().with_channel_capacity(0);
    }

    #[test]
    #[should_panic(expected = "Window size must be positive")]
    fn builder_with_zero_window_panics() {
        EngineBuilder::<TestScene>::new().with_window_size(0, 720);
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let engine = EngineBuilder::<TestScene>::new()
            .with_settle_delay(Duration::from_millis(500))
            .with_fade_duration(Duration::from_millis(100))
            .with_clear_color(Color::from_hex(0x222233))
            .with_window_title("Ballot")
            .with_window_size(800, 600)
            .build();

        assert_eq!(engine.manager.settle_delay(), Duration::from_millis(500));
        assert_eq!(engine.manager.overlay().fade_duration(), Duration::from_millis(100));
        assert_eq!(
            engine.manager.context().renderer.clear_color(),
            Color::from_hex(0x222233)
        );
        assert_eq!(engine.window.title, "Ballot");
        assert_eq!((engine.window.width, engine.window.height), (800, 600));
    }

    #[test]
    fn build_uses_supplied_camera_and_renderer() {
        let mut camera = Camera::new();
        camera.set_position(1.0, 2.0, 3.0);

        let engine = EngineBuilder::<TestScene>::new()
            .with_camera(camera.clone())
            .with_renderer(Box::new(HeadlessRenderer::with_history(8)))
            .build();

        assert_eq!(engine.manager.context().camera, camera);
        assert!(engine.manager.context().renderer_as::<HeadlessRenderer>().is_some());
    }

    //=====================================================================
    // Engine Tests
    //=====================================================================

    #[test]
    fn init_registers_scenes() {
        let engine = EngineBuilder::<TestScene>::new().build().init(|manager| {
            manager
                .register_scene(TestScene::Intro, FnScene::new(SceneRoot::new("intro")))
                .unwrap();
            manager
                .register_factory(TestScene::Booth, |_ctx| FnScene::new(SceneRoot::new("booth")))
                .unwrap();
            manager.transition_to(TestScene::Intro).unwrap();
        });

        assert_eq!(engine.manager.registry().len(), 2);
        assert_eq!(engine.manager.pending_target(), Some(&TestScene::Intro));
        assert!(!engine.manager.is_running(), "loop starts in run()");
    }

    #[test]
    fn transition_handle_reaches_manager() {
        let mut engine = EngineBuilder::<TestScene>::new().build().init(|manager| {
            manager
                .register_scene(TestScene::Booth, FnScene::new(SceneRoot::new("booth")))
                .unwrap();
        });

        assert!(engine.transition_handle().request(TestScene::Booth));

        engine.manager.start();
        engine.manager.frame(Duration::ZERO);
        assert_eq!(engine.manager.pending_target(), Some(&TestScene::Booth));
    }
}
