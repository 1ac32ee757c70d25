//=========================================================================
// Closure Scenes
//=========================================================================
//
// Scenes assembled from optional closures instead of a dedicated type.
//
// Each hook is an `Option`; `provides()` reports which ones are present
// and the manager skips the rest. Useful for small content scenes and
// for tests.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{Hook, HookResult, Scene, SceneKey};
use crate::core::context::SceneContext;
use crate::core::input::InputEvent;
use crate::core::render::SceneRoot;

//=== Hook Types ==========================================================

type LifecycleFn<S> = Box<dyn FnMut(&mut SceneRoot, &mut SceneContext<S>) -> HookResult>;
type InputFn<S> = Box<dyn FnMut(&mut SceneRoot, &InputEvent, &mut SceneContext<S>) -> HookResult>;

//=== FnScene =============================================================

/// Scene whose hooks are optional closures over its root.
///
/// ```rust
/// # use ballot_engine::prelude::*;
/// let menu: FnScene<&'static str> = FnScene::new(SceneRoot::new("menu"))
///     .with_enter(|_root, ctx| {
///         ctx.camera.set_position(0.0, 2.0, 5.0);
///         Ok(())
///     })
///     .with_render(|_root, ctx| {
///         ctx.renderer.set_clear_color(Color::from_hex(0x222233));
///         Ok(())
///     });
///
/// assert!(menu.provides(Hook::Render));
/// assert!(!menu.provides(Hook::Update));
/// ```
pub struct FnScene<S: SceneKey> {
    root: SceneRoot,
    on_enter: Option<LifecycleFn<S>>,
    on_exit: Option<LifecycleFn<S>>,
    update: Option<LifecycleFn<S>>,
    render: Option<LifecycleFn<S>>,
    on_input: Option<InputFn<S>>,
}

impl<S: SceneKey> FnScene<S> {
    pub fn new(root: SceneRoot) -> Self {
        Self {
            root,
            on_enter: None,
            on_exit: None,
            update: None,
            render: None,
            on_input: None,
        }
    }

    pub fn with_enter<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut SceneRoot, &mut SceneContext<S>) -> HookResult + 'static,
    {
        self.on_enter = Some(Box::new(hook));
        self
    }

    pub fn with_exit<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut SceneRoot, &mut SceneContext<S>) -> HookResult + 'static,
    {
        self.on_exit = Some(Box::new(hook));
        self
    }

    pub fn with_update<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut SceneRoot, &mut SceneContext<S>) -> HookResult + 'static,
    {
        self.update = Some(Box::new(hook));
        self
    }

    pub fn with_render<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut SceneRoot, &mut SceneContext<S>) -> HookResult + 'static,
    {
        self.render = Some(Box::new(hook));
        self
    }

    pub fn with_input<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut SceneRoot, &InputEvent, &mut SceneContext<S>) -> HookResult + 'static,
    {
        self.on_input = Some(Box::new(hook));
        self
    }
}

fn run_lifecycle<S: SceneKey>(
    hook: &mut Option<LifecycleFn<S>>,
    root: &mut SceneRoot,
    ctx: &mut SceneContext<S>,
) -> HookResult {
    match hook {
        Some(hook) => hook(root, ctx),
        None => Ok(()),
    }
}

impl<S: SceneKey> Scene<S> for FnScene<S> {
    fn on_enter(&mut self, ctx: &mut SceneContext<S>) -> HookResult {
        run_lifecycle(&mut self.on_enter, &mut self.root, ctx)
    }

    fn on_exit(&mut self, ctx: &mut SceneContext<S>) -> HookResult {
        run_lifecycle(&mut self.on_exit, &mut self.root, ctx)
    }

    fn update(&mut self, ctx: &mut SceneContext<S>) -> HookResult {
        run_lifecycle(&mut self.update, &mut self.root, ctx)
    }

    fn render(&mut self, ctx: &mut SceneContext<S>) -> HookResult {
        run_lifecycle(&mut self.render, &mut self.root, ctx)
    }

    fn on_input(&mut self, event: &InputEvent, ctx: &mut SceneContext<S>) -> HookResult {
        match &mut self.on_input {
            Some(hook) => hook(&mut self.root, event, ctx),
            None => Ok(()),
        }
    }

    fn provides(&self, hook: Hook) -> bool {
        match hook {
            Hook::Enter => self.on_enter.is_some(),
            Hook::Exit => self.on_exit.is_some(),
            Hook::Update => self.update.is_some(),
            Hook::Render => self.render.is_some(),
            Hook::Input => self.on_input.is_some(),
        }
    }

    fn root(&self) -> &SceneRoot {
        &self.root
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::{Camera, HeadlessRenderer, Node};

    fn context() -> SceneContext<&'static str> {
        SceneContext::new(Box::new(HeadlessRenderer::new()), Camera::new())
    }

    #[test]
    fn empty_scene_provides_nothing() {
        let scene: FnScene<&'static str> = FnScene::new(SceneRoot::new("blank"));
        for hook in [Hook::Enter, Hook::Exit, Hook::Update, Hook::Render, Hook::Input] {
            assert!(!scene.provides(hook), "{} should be absent", hook);
        }
    }

    #[test]
    fn absent_hooks_are_noops() {
        let mut scene: FnScene<&'static str> = FnScene::new(SceneRoot::new("blank"));
        let mut ctx = context();
        assert!(scene.on_enter(&mut ctx).is_ok());
        assert!(scene.update(&mut ctx).is_ok());
    }

    #[test]
    fn hooks_mutate_root() {
        let mut scene: FnScene<&'static str> = FnScene::new(SceneRoot::new("booth"))
            .with_enter(|root, _ctx| {
                root.add(Node::new("ballot"));
                Ok(())
            })
            .with_exit(|root, _ctx| {
                root.clear();
                Ok(())
            });
        let mut ctx = context();

        scene.on_enter(&mut ctx).unwrap();
        assert_eq!(scene.root().len(), 1);

        scene.on_exit(&mut ctx).unwrap();
        assert!(scene.root().is_empty());
    }

    #[test]
    fn input_hook_sees_event() {
        use crate::core::input::KeyCode;

        let mut scene: FnScene<&'static str> =
            FnScene::new(SceneRoot::new("menu")).with_input(|_root, event, ctx| {
                if event.is_press_of(KeyCode::Enter) {
                    ctx.request_transition("votingBooth");
                }
                Ok(())
            });
        let mut ctx = context();

        scene
            .on_input(&InputEvent::KeyPressed { key: KeyCode::Enter, repeat: false }, &mut ctx)
            .unwrap();

        assert!(scene.provides(Hook::Input));
        assert_eq!(ctx.transitions.len(), 1);
    }

    #[test]
    fn hook_errors_propagate() {
        let mut scene: FnScene<&'static str> = FnScene::new(SceneRoot::new("broken"))
            .with_update(|_root, _ctx| Err(anyhow::anyhow!("model not loaded")));
        let mut ctx = context();

        let err = scene.update(&mut ctx).unwrap_err();
        assert_eq!(err.to_string(), "model not loaded");
    }
}
