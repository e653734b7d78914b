use winit::event::WindowEvent;
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

use crate::input::{InputEvent, InputState, Key, KeyState, Modifiers};

/// Translates a winit `WindowEvent` into an engine `InputEvent`.
///
/// Returns `None` for events not represented by the input subsystem.
pub(crate) fn translate_window_event(state: &InputState, event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::ModifiersChanged(m) => {
            // winit 0.30: ModifiersChanged carries a wrapper with `.state()`.
            let ms: ModifiersState = m.state();
            Some(InputEvent::ModifiersChanged(map_modifiers(ms)))
        }

        WindowEvent::Focused(f) => Some(InputEvent::Focused(*f)),

        WindowEvent::KeyboardInput { event, .. } => {
            let st = KeyState::from_pressed(event.state.is_pressed());

            let (key, code) = map_key(event.physical_key);

            Some(InputEvent::Key {
                key,
                state: st,
                modifiers: state.modifiers,
                code,
                repeat: event.repeat,
            })
        }

        _ => None,
    }
}

fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        meta: m.super_key(),
    }
}

/// Winit codes for [`Key::LETTERS`], index for index.
const LETTER_CODES: [KeyCode; 26] = {
    use KeyCode::*;
    [
        KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI, KeyJ, KeyK, KeyL, KeyM,
        KeyN, KeyO, KeyP, KeyQ, KeyR, KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,
    ]
};

/// Winit codes for [`Key::DIGITS`], index for index.
const DIGIT_CODES: [KeyCode; 10] = {
    use KeyCode::*;
    [Digit0, Digit1, Digit2, Digit3, Digit4, Digit5, Digit6, Digit7, Digit8, Digit9]
};

fn map_key(pk: PhysicalKey) -> (Key, u32) {
    // NativeKeyCode is not a u32 in winit 0.30.
    let PhysicalKey::Code(code) = pk else {
        return (Key::Unknown(0), 0);
    };

    let lookup = |codes: &[KeyCode], keys: &[Key]| {
        codes.iter().position(|c| *c == code).map(|i| keys[i])
    };

    let key = lookup(&LETTER_CODES, &Key::LETTERS)
        .or_else(|| lookup(&DIGIT_CODES, &Key::DIGITS))
        .unwrap_or_else(|| named_key(code));

    (key, code as u32)
}

fn named_key(code: KeyCode) -> Key {
    match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Space => Key::Space,
        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
        KeyCode::ControlLeft | KeyCode::ControlRight => Key::Control,
        KeyCode::AltLeft | KeyCode::AltRight => Key::Alt,
        KeyCode::SuperLeft | KeyCode::SuperRight => Key::Meta,
        other => Key::Unknown(other as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_and_escape_map_to_engine_keys() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyW)).0, Key::W);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyA)).0, Key::A);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyS)).0, Key::S);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyD)).0, Key::D);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::Escape)).0, Key::Escape);
    }

    #[test]
    fn left_and_right_modifiers_collapse() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::ShiftLeft)).0, Key::Shift);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::ShiftRight)).0, Key::Shift);
    }

    #[test]
    fn every_letter_and_digit_maps() {
        for (code, key) in LETTER_CODES.iter().zip(Key::LETTERS) {
            assert_eq!(map_key(PhysicalKey::Code(*code)).0, key);
        }
        for (code, key) in DIGIT_CODES.iter().zip(Key::DIGITS) {
            assert_eq!(map_key(PhysicalKey::Code(*code)).0, key);
        }
    }

    #[test]
    fn unmapped_key_keeps_its_code() {
        let (key, code) = map_key(PhysicalKey::Code(KeyCode::F13));
        assert_eq!(key, Key::Unknown(code));
    }
}
