//=========================================================================
// Input Event Types
//
// Portable representation of the raw input the platform forwards to the
// current scene.
//
// The scene manager does not interpret these events. It buffers them
// between frames and hands each one to the current scene's `on_input`
// hook, unless the transition overlay is blocking input.
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    InputProcessor (platform)
//         ↓
//    InputEvent (this module)
//         ↓
//    SceneManager::push_input → Scene::on_input
// ```
//
//=========================================================================

//=== MouseButton =========================================================

/// Physical mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,

    /// Side buttons, thumb buttons, macro keys.
    Other,
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
/// Covers the keys the game's scenes react to; anything else maps to
/// `Unidentified` and is dropped by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,

    /// Unmapped key (filtered by the platform).
    Unidentified,
}

impl KeyCode {
    /// Returns the digit value for number-row keys.
    pub fn digit(self) -> Option<u8> {
        use KeyCode::*;
        match self {
            Digit0 => Some(0),
            Digit1 => Some(1),
            Digit2 => Some(2),
            Digit3 => Some(3),
            Digit4 => Some(4),
            Digit5 => Some(5),
            Digit6 => Some(6),
            Digit7 => Some(7),
            Digit8 => Some(8),
            Digit9 => Some(9),
            _ => None,
        }
    }
}

//=== InputEvent ==========================================================

/// Raw input delivered to the current scene.
///
/// Pointer coordinates are in physical window pixels. `repeat` is set for
/// OS key-repeat presses; scenes that trigger transitions on a key usually
/// ignore repeats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyPressed { key: KeyCode, repeat: bool },
    KeyReleased { key: KeyCode },
    PointerMoved { x: f32, y: f32 },
    PointerPressed { button: MouseButton, x: f32, y: f32 },
    PointerReleased { button: MouseButton, x: f32, y: f32 },
}

impl InputEvent {
    /// Returns true for a fresh (non-repeat) press of `key`.
    pub fn is_press_of(&self, key: KeyCode) -> bool {
        matches!(self, InputEvent::KeyPressed { key: k, repeat: false } if *k == key)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_keys_report_their_value() {
        assert_eq!(KeyCode::Digit0.digit(), Some(0));
        assert_eq!(KeyCode::Digit7.digit(), Some(7));
        assert_eq!(KeyCode::KeyA.digit(), None);
    }

    #[test]
    fn repeat_presses_are_not_fresh_presses() {
        let fresh = InputEvent::KeyPressed { key: KeyCode::Enter, repeat: false };
        let repeat = InputEvent::KeyPressed { key: KeyCode::Enter, repeat: true };
        let release = InputEvent::KeyReleased { key: KeyCode::Enter };

        assert!(fresh.is_press_of(KeyCode::Enter));
        assert!(!fresh.is_press_of(KeyCode::Space));
        assert!(!repeat.is_press_of(KeyCode::Enter));
        assert!(!release.is_press_of(KeyCode::Enter));
    }
}
