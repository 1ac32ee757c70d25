//=========================================================================
// Core Systems
//
// Everything the scene manager needs that does not touch the OS.
//
// Modules:
// - `scene`: scene trait, registry, transitions, and the manager
// - `context`: shared data handed to scene hooks and factories
// - `render`: render boundary (renderer trait, camera, scene roots)
// - `input`: portable input events forwarded to the current scene
//
// Notes:
// Nothing in here depends on Winit. The platform layer converts OS
// events into `input` types and drives `SceneManager::frame`, which keeps
// the whole core testable with the headless renderer.
//
//=========================================================================

pub mod context;
pub mod input;
pub mod render;
pub mod scene;
