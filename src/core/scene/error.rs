//=========================================================================
// Scene Errors
//=========================================================================
//
// Error taxonomy for the scene system.
//
// Host misuse (unknown or invalid identifiers, resetting the active
// scene) is returned to the caller. Scene failures (hooks and factories
// returning errors or panicking) are caught by the manager, logged, and
// buffered; they never unwind through the frame loop.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::fmt;

use thiserror::Error;

//=== Hook ================================================================

/// Identifies a scene lifecycle hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    Enter,
    Exit,
    Update,
    Render,
    Input,
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Hook::Enter => "on_enter",
            Hook::Exit => "on_exit",
            Hook::Update => "update",
            Hook::Render => "render",
            Hook::Input => "on_input",
        };
        f.write_str(name)
    }
}

//=== SceneError ==========================================================

/// Errors produced by the scene registry and manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// Transition or lookup targeted an unregistered identifier.
    #[error("scene {0} is not registered")]
    NotFound(String),

    /// Registration used an empty identifier.
    #[error("scene identifier must not be empty")]
    InvalidId,

    /// A lifecycle hook returned an error or panicked.
    #[error("{hook} hook of scene {scene} failed: {reason}")]
    HookFailure {
        scene: String,
        hook: Hook,
        reason: String,
    },

    /// A scene factory panicked during materialization.
    #[error("factory for scene {scene} failed: {reason}")]
    FactoryFailure { scene: String, reason: String },

    /// The operation is not allowed on the currently active scene.
    #[error("scene {0} is currently active")]
    SceneActive(String),
}

impl SceneError {
    pub(crate) fn not_found(key: &impl fmt::Debug) -> Self {
        Self::NotFound(format!("{:?}", key))
    }
}

//=== Panic Payloads ======================================================

/// Extracts a readable message from a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_owned()
    }
}

//=========================================================================
// Tests
//=========================================================================
