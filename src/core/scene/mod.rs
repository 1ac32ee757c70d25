//=========================================================================
// Scene System
//=========================================================================
//
// Manages scene registration, lazy construction, and fade-masked
// transitions between exactly one active scene at a time.
//
// Architecture:
//   SceneManager
//     ├─ registry: SceneRegistry<S>     (id → factory | instance)
//     ├─ context: SceneContext<S>       (renderer, camera, overlay)
//     ├─ current: Option<S>
//     └─ pending: Option<PendingTransition<S>>
//
// Flow:
//   transition_to() → overlay shown → settle delay → on_exit(old)
//     → resolve(new) → on_enter(new) → overlay hidden
//   frame() → on_input → update() → render() → Renderer::draw()
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;

//=== Internal Dependencies ===============================================

use crate::core::context::SceneContext;
use crate::core::input::InputEvent;
use crate::core::render::SceneRoot;

//=== Module Declarations =================================================

mod error;
mod hooks;
mod manager;
mod registry;
mod transition;
mod transition_queue;

//=== Public API ==========================================================

pub use error::{Hook, SceneError};
pub use hooks::FnScene;
pub use manager::{ManagerConfig, SceneManager, DEFAULT_SETTLE_DELAY};
pub use registry::{SceneFactory, SceneRegistry, SceneSource};
pub use transition::{Easing, FadeOverlay};
pub use transition_queue::{TransitionHandle, TransitionQueue, TransitionRequest};

pub(crate) use error::panic_message;

//=== Scene Key Trait =====================================================

/// Identifier for registered scenes.
///
/// Implemented for `&'static str` and `String`, which must be non-empty.
/// Game-specific enums can implement it with the default validity check.
///
/// ```rust
/// # use ballot_engine::prelude::*;
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Chapter { Intro, VotingBooth }
/// impl SceneKey for Chapter {}
///
/// assert!(Chapter::Intro.is_valid());
/// assert!(!"".is_valid());
/// ```
pub trait SceneKey: Clone + Eq + Hash + Debug + Send + 'static {
    /// Whether this identifier may be registered.
    fn is_valid(&self) -> bool {
        true
    }
}

impl SceneKey for &'static str {
    fn is_valid(&self) -> bool {
        !self.is_empty()
    }
}

impl SceneKey for String {
    fn is_valid(&self) -> bool {
        !self.is_empty()
    }
}

//=== Scene Trait =========================================================

/// Result returned by scene hooks.
///
/// Errors are caught and logged by the manager; they never stop the
/// frame loop or a transition.
pub type HookResult = anyhow::Result<()>;

/// A self-contained unit of game content.
///
/// Every hook is optional. Only [`Scene::root`] is required so the manager
/// has something to draw.
///
/// # Teardown Contract
///
/// `on_exit` must release everything the scene set up (UI, listeners,
/// per-visit state) before it returns. The incoming scene's `on_enter`
/// runs immediately afterwards.
///
/// # Asynchronous Setup
///
/// The manager does not wait for work a scene starts in `on_enter`.
/// `update` and `render` may run before that work completes, so scenes
/// guard on their own readiness.
///
/// # Minimal Implementation
///
/// ```rust
/// # use ballot_engine::prelude::*;
/// struct Ending {
///     root: SceneRoot,
/// }
///
/// impl Scene<&'static str> for Ending {
///     fn render(&mut self, ctx: &mut SceneContext<&'static str>) -> HookResult {
///         ctx.renderer.set_clear_color(Color::from_hex(0x000000));
///         Ok(())
///     }
///
///     fn root(&self) -> &SceneRoot {
///         &self.root
///     }
/// }
/// ```
pub trait Scene<S: SceneKey> {
    /// Called each time a transition makes this scene current.
    fn on_enter(&mut self, _ctx: &mut SceneContext<S>) -> HookResult {
        Ok(())
    }

    /// Called each time a transition makes this scene no longer current.
    fn on_exit(&mut self, _ctx: &mut SceneContext<S>) -> HookResult {
        Ok(())
    }

    /// Game logic and animation, once per frame while current.
    fn update(&mut self, _ctx: &mut SceneContext<S>) -> HookResult {
        Ok(())
    }

    /// Scene-specific render state (clear color etc.), after `update`.
    fn render(&mut self, _ctx: &mut SceneContext<S>) -> HookResult {
        Ok(())
    }

    /// Raw input, delivered before `update` unless the overlay is up.
    fn on_input(&mut self, _event: &InputEvent, _ctx: &mut SceneContext<S>) -> HookResult {
        Ok(())
    }

    /// Whether the scene provides `hook`. Absent hooks are skipped.
    fn provides(&self, _hook: Hook) -> bool {
        true
    }

    /// The renderable content drawn after `render`.
    fn root(&self) -> &SceneRoot;
}
