use std::fmt;

/// Physical key, named after its position on a US layout.
///
/// `W`/`A`/`S`/`D` are the same physical keys on every layout. Keys outside
/// this set arrive as `Unknown` with the platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Shift,
    Control,
    Alt,
    Meta,

    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Digits
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    /// Platform-dependent key not represented here.
    Unknown(u32),
}

impl Key {
    /// `A` through `Z`.
    pub const LETTERS: [Key; 26] = [
        Key::A, Key::B, Key::C, Key::D, Key::E, Key::F, Key::G, Key::H, Key::I,
        Key::J, Key::K, Key::L, Key::M, Key::N, Key::O, Key::P, Key::Q, Key::R,
        Key::S, Key::T, Key::U, Key::V, Key::W, Key::X, Key::Y, Key::Z,
    ];

    /// `0` through `9`.
    pub const DIGITS: [Key; 10] = [
        Key::Digit0, Key::Digit1, Key::Digit2, Key::Digit3, Key::Digit4,
        Key::Digit5, Key::Digit6, Key::Digit7, Key::Digit8, Key::Digit9,
    ];
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(n) = Key::DIGITS.iter().position(|d| d == self) {
            return write!(f, "{n}");
        }
        match self {
            Key::Unknown(code) => write!(f, "key #{code}"),
            other => write!(f, "{other:?}"),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

impl KeyState {
    pub fn from_pressed(pressed: bool) -> Self {
        if pressed {
            KeyState::Pressed
        } else {
            KeyState::Released
        }
    }
}

/// Modifier keys state.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Input events the runtime delivers to `App::on_input`, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),

    Key {
        key: Key,
        state: KeyState,
        modifiers: Modifiers,
        /// Platform key code; 0 when the platform gives none.
        code: u32,
        /// Auto-repeat while held.
        repeat: bool,
    },

    /// Focus gained (`true`) or lost. Losing focus releases every held key.
    Focused(bool),
}

impl InputEvent {
    /// Returns `true` for the initial (non-repeat) press of `key`.
    pub fn is_press_of(&self, key: Key) -> bool {
        matches!(
            self,
            InputEvent::Key { key: k, state: KeyState::Pressed, repeat: false, .. } if *k == key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_display_readably() {
        assert_eq!(Key::W.to_string(), "W");
        assert_eq!(Key::Escape.to_string(), "Escape");
        assert_eq!(Key::Digit7.to_string(), "7");
        assert_eq!(Key::Unknown(42).to_string(), "key #42");
    }

    #[test]
    fn letter_and_digit_tables_are_ordered() {
        assert_eq!(Key::LETTERS[0], Key::A);
        assert_eq!(Key::LETTERS[25], Key::Z);
        let names: String = Key::LETTERS.iter().map(Key::to_string).collect();
        assert_eq!(names, "ABCDEFGHIJKLMNOPQRSTUVWXYZ");
        let digits: String = Key::DIGITS.iter().map(Key::to_string).collect();
        assert_eq!(digits, "0123456789");
    }

    #[test]
    fn repeat_is_not_a_press() {
        let ev = InputEvent::Key {
            key: Key::Escape,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            code: 0,
            repeat: true,
        };
        assert!(!ev.is_press_of(Key::Escape));
    }
}
