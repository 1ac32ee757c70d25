//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use ballot_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{Engine, EngineBuilder};
pub use crate::platform::PlatformError;

// Scene system
pub use crate::core::scene::{
    Easing, FadeOverlay, FnScene, Hook, HookResult, ManagerConfig, Scene, SceneError, SceneKey,
    SceneManager, SceneRegistry, SceneSource, TransitionHandle, DEFAULT_SETTLE_DELAY,
};

// Scene context
pub use crate::core::context::{FrameTime, SceneContext};

// Rendering
pub use crate::core::render::{
    Camera, Color, HeadlessRenderer, Node, RenderOp, Renderer, SceneRoot,
};

// Input
pub use crate::core::input::{InputEvent, KeyCode, MouseButton};
