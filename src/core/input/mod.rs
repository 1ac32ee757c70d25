//=========================================================================
// Input Forwarding
//
// Raw input types passed from the platform layer to scenes.
//
// Notes:
// Input is interpreted entirely inside scenes. This module only defines
// the portable event vocabulary; there is no action mapping or state
// tracking at the engine level.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;

//=== Public API ==========================================================

pub use event::{InputEvent, KeyCode, MouseButton};
