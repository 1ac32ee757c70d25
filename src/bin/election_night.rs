//=========================================================================
// Election Night
//
// Demo host: intro card, voting booth, and the televised count.
//
// Flow:
// ```text
//   intro ──(3 s or Enter)──> votingBooth ──(digit 1-3)──> tvCount
//     ↑                                                       │
//     └────────────────────────(Enter)────────────────────────┘
// ```
//
// The intro is registered as a factory (built on first visit); the booth
// is constructed up front; the count is a closure scene.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;
use std::time::Duration;

use ballot_engine::prelude::*;
use glam::Vec3;
use log::{error, info};

//=== Scene Identifiers ===================================================

const INTRO: &str = "intro";
const VOTING_BOOTH: &str = "votingBooth";
const TV_COUNT: &str = "tvCount";

type Ctx = SceneContext<&'static str>;

//=== Intro ===============================================================

struct IntroScene {
    root: SceneRoot,
    shown_for: Duration,
    advanced: bool,
}

impl IntroScene {
    const HOLD: Duration = Duration::from_secs(3);

    fn new() -> Self {
        let mut root = SceneRoot::new(INTRO);
        root.add(Node::new("title_card"));
        Self {
            root,
            shown_for: Duration::ZERO,
            advanced: false,
        }
    }

    fn advance(&mut self, ctx: &mut Ctx) {
        if !self.advanced {
            self.advanced = true;
            ctx.request_transition(VOTING_BOOTH);
        }
    }
}

impl Scene<&'static str> for IntroScene {
    fn on_enter(&mut self, ctx: &mut Ctx) -> HookResult {
        self.shown_for = Duration::ZERO;
        self.advanced = false;
        ctx.camera.set_position(0.0, 1.6, 5.0);
        ctx.camera.look_at(0.0, 1.6, 0.0);
        Ok(())
    }

    fn update(&mut self, ctx: &mut Ctx) -> HookResult {
        self.shown_for += ctx.time().delta;
        if self.shown_for >= Self::HOLD {
            self.advance(ctx);
        }
        Ok(())
    }

    fn render(&mut self, ctx: &mut Ctx) -> HookResult {
        ctx.renderer.set_clear_color(Color::from_hex(0x111122));
        Ok(())
    }

    fn on_input(&mut self, event: &InputEvent, ctx: &mut Ctx) -> HookResult {
        if event.is_press_of(KeyCode::Enter) {
            self.advance(ctx);
        }
        Ok(())
    }

    fn root(&self) -> &SceneRoot {
        &self.root
    }
}

//=== Voting Booth ========================================================

struct VotingBooth {
    root: SceneRoot,
    ballot: Rc<Cell<Option<u8>>>,
    walk: Vec3,
    /// Walk keys whose press this scene has seen.
    held: HashSet<KeyCode>,
    sway: f32,
}

impl VotingBooth {
    const WALK_SPEED: f32 = 2.0;

    fn new(ballot: Rc<Cell<Option<u8>>>) -> Self {
        let mut root = SceneRoot::new(VOTING_BOOTH);
        root.add(Node::new("floor"))
            .add(Node::new("booth").at(Vec3::new(0.0, 0.0, -2.0)))
            .add(Node::new("ballot_box").at(Vec3::new(1.5, 0.0, -1.0)))
            .add(Node::new("flag").at(Vec3::new(-2.0, 0.0, -3.0)));
        Self {
            root,
            ballot,
            walk: Vec3::ZERO,
            held: HashSet::new(),
            sway: 0.0,
        }
    }

    fn walk_axis(key: KeyCode) -> Option<Vec3> {
        match key {
            KeyCode::KeyW | KeyCode::ArrowUp => Some(Vec3::NEG_Z),
            KeyCode::KeyS | KeyCode::ArrowDown => Some(Vec3::Z),
            KeyCode::KeyA | KeyCode::ArrowLeft => Some(Vec3::NEG_X),
            KeyCode::KeyD | KeyCode::ArrowRight => Some(Vec3::X),
            _ => None,
        }
    }
}

impl Scene<&'static str> for VotingBooth {
    fn on_enter(&mut self, ctx: &mut Ctx) -> HookResult {
        self.walk = Vec3::ZERO;
        self.held.clear();
        ctx.camera.set_position(0.0, 1.6, 5.0);
        ctx.camera.look_at(0.0, 0.0, 0.0);
        Ok(())
    }

    fn on_exit(&mut self, _ctx: &mut Ctx) -> HookResult {
        self.walk = Vec3::ZERO;
        self.held.clear();
        Ok(())
    }

    fn update(&mut self, ctx: &mut Ctx) -> HookResult {
        let dt = ctx.delta_secs();
        if self.walk != Vec3::ZERO {
            let step = self.walk.normalize() * Self::WALK_SPEED * dt;
            ctx.camera.position += step;
            ctx.camera.target += step;
        }

        self.sway += dt;
        if let Some(flag) = self.root.node_mut("flag") {
            flag.position.y = (self.sway * 1.5).sin() * 0.1;
        }
        Ok(())
    }

    fn render(&mut self, ctx: &mut Ctx) -> HookResult {
        ctx.renderer.set_clear_color(Color::from_hex(0xcccccc));
        Ok(())
    }

    fn on_input(&mut self, event: &InputEvent, ctx: &mut Ctx) -> HookResult {
        match *event {
            InputEvent::KeyPressed { key, repeat: false } => {
                if let Some(axis) = Self::walk_axis(key) {
                    if self.held.insert(key) {
                        self.walk += axis;
                    }
                } else if let Some(choice @ 1..=3) = key.digit() {
                    info!("Ballot cast for candidate {}", choice);
                    self.ballot.set(Some(choice));
                    ctx.request_transition(TV_COUNT);
                }
            }
            InputEvent::KeyReleased { key } => {
                if let Some(axis) = Self::walk_axis(key) {
                    // A press swallowed by the overlay has no matching step.
                    if self.held.remove(&key) {
                        self.walk -= axis;
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn root(&self) -> &SceneRoot {
        &self.root
    }
}

//=== TV Count ============================================================

fn tv_count(ballot: Rc<Cell<Option<u8>>>) -> FnScene<&'static str> {
    let mut root = SceneRoot::new(TV_COUNT);
    root.add(Node::new("studio_desk")).add(Node::new("tally_board"));

    FnScene::new(root)
        .with_enter(move |_root, ctx| {
            match ballot.get() {
                Some(choice) => info!("Counting begins; your vote went to candidate {}", choice),
                None => info!("Counting begins; no ballot on record"),
            }
            ctx.camera.set_position(0.0, 2.0, 6.0);
            ctx.camera.look_at(0.0, 1.5, 0.0);
            Ok(())
        })
        .with_render(|_root, ctx| {
            ctx.renderer.set_clear_color(Color::from_hex(0xfceabb));
            Ok(())
        })
        .with_input(|_root, event, ctx| {
            if event.is_press_of(KeyCode::Enter) {
                ctx.request_transition(INTRO);
            }
            Ok(())
        })
}

//=== Setup ===============================================================

fn register_scenes(manager: &mut SceneManager<&'static str>) -> Result<(), SceneError> {
    let ballot = Rc::new(Cell::new(None));

    manager.register_factory(INTRO, |_ctx| IntroScene::new())?;
    manager.register_scene(VOTING_BOOTH, VotingBooth::new(Rc::clone(&ballot)))?;
    manager.register_scene(TV_COUNT, tv_count(ballot))?;

    manager.transition_to(INTRO)
}

fn main() -> Result<(), PlatformError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    EngineBuilder::<&'static str>::new()
        .with_window_title("Election Night")
        .with_clear_color(Color::from_hex(0x222233))
        .build()
        .init(|manager| {
            if let Err(err) = register_scenes(manager) {
                error!("Scene setup failed: {}", err);
            }
        })
        .run()
}

//=========================================================================
// Tests
//=========================================================================
