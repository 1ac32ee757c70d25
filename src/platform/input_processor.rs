//=========================================================================
// Input Processor
//=========================================================================
//
// Converts platform-specific Winit events into engine InputEvents.
//
// Architecture:
//   Winit Events → InputProcessor → InputEvent (engine type) → SceneManager
//
// Stateful cursor tracking: Winit reports button presses without a
// position, so the last CursorMoved position is cached and stamped onto
// pointer press/release events. Unmapped keys (F13-F24, exotic keyboards)
// are filtered (returns None).
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::ElementState,
    event::{KeyEvent, MouseButton as WinitMouseButton},
    keyboard::{KeyCode as WinitKeyCode, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, KeyCode, MouseButton};

//=== InputProcessor ======================================================

/// Converts Winit events to engine InputEvents with cursor tracking.
pub(crate) struct InputProcessor {
    cursor: (f32, f32),
}

impl InputProcessor {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self { cursor: (0.0, 0.0) }
    }

    #[cfg(test)]
    pub(crate) fn cursor(&self) -> (f32, f32) {
        self.cursor
    }

    //--- Event Processing -------------------------------------------------

    /// Converts Winit KeyEvent to InputEvent (filters unmapped keys).
    pub(crate) fn process_key_event(&self, key_event: &KeyEvent) -> Option<InputEvent> {
        let key_code = match key_event.physical_key {
            PhysicalKey::Code(code) => KeyCode::from(code),
            _ => return None,
        };

        if matches!(key_code, KeyCode::Unidentified) {
            return None;
        }

        Some(self.create_key_input_event(key_code, key_event.state, key_event.repeat))
    }

    /// Converts Winit mouse button event to InputEvent at the cached cursor.
    pub(crate) fn process_mouse_button(
        &self,
        button: WinitMouseButton,
        state: ElementState,
    ) -> InputEvent {
        let button = MouseButton::from(button);
        let (x, y) = self.cursor;

        match state {
            ElementState::Pressed => InputEvent::PointerPressed { button, x, y },
            ElementState::Released => InputEvent::PointerReleased { button, x, y },
        }
    }

    /// Records the cursor and creates a pointer move event (screen space).
    pub(crate) fn process_mouse_move(&mut self, x: f32, y: f32) -> InputEvent {
        self.cursor = (x, y);
        InputEvent::PointerMoved { x, y }
    }

    //--- Internal Helpers -------------------------------------------------

    fn create_key_input_event(&self, key: KeyCode, state: ElementState, repeat: bool) -> InputEvent {
        match state {
            ElementState::Pressed => InputEvent::KeyPressed { key, repeat },
            ElementState::Released => InputEvent::KeyReleased { key },
        }
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Converts Winit physical key codes to engine key codes.
///
/// Maps A-Z, 0-9 (row and numpad), arrows, and common special keys.
/// Everything else returns `KeyCode::Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Digits -------------------------------------------------------

            Digit0 | Numpad0 => KeyCode::Digit0,
            Digit1 | Numpad1 => KeyCode::Digit1,
            Digit2 | Numpad2 => KeyCode::Digit2,
            Digit3 | Numpad3 => KeyCode::Digit3,
            Digit4 | Numpad4 => KeyCode::Digit4,
            Digit5 | Numpad5 => KeyCode::Digit5,
            Digit6 | Numpad6 => KeyCode::Digit6,
            Digit7 | Numpad7 => KeyCode::Digit7,
            Digit8 | Numpad8 => KeyCode::Digit8,
            Digit9 | Numpad9 => KeyCode::Digit9,

            //--- Letters ------------------------------------------------------

            KeyA => KeyCode::KeyA,
            KeyB => KeyCode::KeyB,
            KeyC => KeyCode::KeyC,
            KeyD => KeyCode::KeyD,
            KeyE => KeyCode::KeyE,
            KeyF => KeyCode::KeyF,
            KeyG => KeyCode::KeyG,
            KeyH => KeyCode::KeyH,
            KeyI => KeyCode::KeyI,
            KeyJ => KeyCode::KeyJ,
            KeyK => KeyCode::KeyK,
            KeyL => KeyCode::KeyL,
            KeyM => KeyCode::KeyM,
            KeyN => KeyCode::KeyN,
            KeyO => KeyCode::KeyO,
            KeyP => KeyCode::KeyP,
            KeyQ => KeyCode::KeyQ,
            KeyR => KeyCode::KeyR,
            KeyS => KeyCode::KeyS,
            KeyT => KeyCode::KeyT,
            KeyU => KeyCode::KeyU,
            KeyV => KeyCode::KeyV,
            KeyW => KeyCode::KeyW,
            KeyX => KeyCode::KeyX,
            KeyY => KeyCode::KeyY,
            KeyZ => KeyCode::KeyZ,

            //--- Arrows -------------------------------------------------------

            ArrowUp => KeyCode::ArrowUp,
            ArrowDown => KeyCode::ArrowDown,
            ArrowLeft => KeyCode::ArrowLeft,
            ArrowRight => KeyCode::ArrowRight,

            //--- Special ------------------------------------------------------

            Space => KeyCode::Space,
            Enter | NumpadEnter => KeyCode::Enter,
            Escape => KeyCode::Escape,
            Tab => KeyCode::Tab,
            Backspace => KeyCode::Backspace,

            //--- Unmapped (return Unidentified) -------------------------------

            _ => KeyCode::Unidentified,
        }
    }
}

/// Converts Winit mouse buttons to engine buttons.
///
/// Left/Right/Middle mapped directly; Back/Forward/Other → Other.
impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode as WinitKeyCode;

    #[test]
    fn starts_with_cursor_at_origin() {
        let processor = InputProcessor::new();
        assert_eq!(processor.cursor(), (0.0, 0.0));
    }

    #[test]
    fn key_press_keeps_repeat_flag() {
        let processor = InputProcessor::new();

        let event = processor.create_key_input_event(KeyCode::Digit3, ElementState::Pressed, true);

        assert_eq!(event, InputEvent::KeyPressed { key: KeyCode::Digit3, repeat: true });
    }

    #[test]
    fn key_release_drops_repeat_flag() {
        let processor = InputProcessor::new();

        let event = processor.create_key_input_event(KeyCode::KeyA, ElementState::Released, false);

        assert_eq!(event, InputEvent::KeyReleased { key: KeyCode::KeyA });
    }

    #[test]
    fn keycode_conversion_filters_unidentified() {
        let unidentified = KeyCode::from(WinitKeyCode::F13);
        assert!(matches!(unidentified, KeyCode::Unidentified));
    }

    #[test]
    fn mouse_move_updates_cursor() {
        let mut processor = InputProcessor::new();
        let event = processor.process_mouse_move(123.5, 456.7);

        assert_eq!(event, InputEvent::PointerMoved { x: 123.5, y: 456.7 });
        assert_eq!(processor.cursor(), (123.5, 456.7));
    }

    #[test]
    fn mouse_button_uses_last_cursor_position() {
        let mut processor = InputProcessor::new();
        processor.process_mouse_move(40.0, 80.0);

        let pressed = processor.process_mouse_button(WinitMouseButton::Left, ElementState::Pressed);
        let released = processor.process_mouse_button(WinitMouseButton::Left, ElementState::Released);

        assert_eq!(
            pressed,
            InputEvent::PointerPressed { button: MouseButton::Left, x: 40.0, y: 80.0 }
        );
        assert_eq!(
            released,
            InputEvent::PointerReleased { button: MouseButton::Left, x: 40.0, y: 80.0 }
        );
    }

    #[test]
    fn keycode_conversion_digits_include_numpad() {
        assert_eq!(KeyCode::from(WinitKeyCode::Digit1), KeyCode::Digit1);
        assert_eq!(KeyCode::from(WinitKeyCode::Numpad1), KeyCode::Digit1);
        assert_eq!(KeyCode::from(WinitKeyCode::NumpadEnter), KeyCode::Enter);
    }

    #[test]
    fn keycode_conversion_alphabetic() {
        assert_eq!(KeyCode::from(WinitKeyCode::KeyA), KeyCode::KeyA);
        assert_eq!(KeyCode::from(WinitKeyCode::KeyZ), KeyCode::KeyZ);
    }

    #[test]
    fn mouse_button_conversion() {
        assert_eq!(MouseButton::from(WinitMouseButton::Left), MouseButton::Left);
        assert_eq!(MouseButton::from(WinitMouseButton::Right), MouseButton::Right);
        assert_eq!(MouseButton::from(WinitMouseButton::Back), MouseButton::Other);
    }
}
