//=========================================================================
// Ballot Engine - Library Root
//
// Scene lifecycle management for an election-night voting game,
// rendered through a single shared renderer and camera.
//
// Responsibilities:
// - Expose the engine facade (`Engine`, `EngineBuilder`)
// - Expose the scene system (`core::scene`) for registration and
//   transitions
// - Keep the Winit integration (`platform`) hidden from end users
//
// Typical usage:
// ```no_run
// use ballot_engine::prelude::*;
//
// fn main() -> Result<(), PlatformError> {
//     EngineBuilder::<&'static str>::new()
//         .build()
//         .init(|manager| {
//             manager
//                 .register_factory("intro", |_ctx| FnScene::new(SceneRoot::new("intro")))
//                 .unwrap();
//             manager.transition_to("intro").unwrap();
//         })
//         .run()
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the scene system and everything it hands to scenes
// (context, render boundary, input events). Hosts that drive frames
// themselves (tests, headless tools) use `core::scene::SceneManager`
// directly.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains the Winit integration (window, event loop, input
// conversion) and is kept private.
//
// `engine` defines the builder and the runtime entry point.
//
mod platform;
mod engine;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder};
pub use platform::PlatformError;
