use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState, Modifiers};

/// Keyboard state of a single window.
///
/// Owned by the runtime and written only while it dispatches window events on the
/// event-loop thread; applications read it through the frame context.
#[derive(Debug, Default)]
pub struct InputState {
    /// Current modifier state.
    pub modifiers: Modifiers,

    /// Whether the window is focused.
    pub focused: bool,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies an input event to the current state and records transitions in `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Releases are not delivered to unfocused windows.
                    self.keys_down.clear();
                }
            }

            InputEvent::Key {
                key,
                state,
                modifiers,
                ..
            } => {
                self.modifiers = *modifiers;

                match state {
                    KeyState::Pressed => {
                        if self.keys_down.insert(*key) {
                            frame.record_transition(*key, KeyState::Pressed);
                        }
                    }
                    KeyState::Released => {
                        if self.keys_down.remove(key) {
                            frame.record_transition(*key, KeyState::Released);
                        }
                    }
                }
            }
        }

        frame.record_event(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key {
            key,
            state,
            modifiers: Modifiers::default(),
            code: 0,
            repeat: false,
        }
    }

    #[test]
    fn press_then_release_tracks_held_keys() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::D, KeyState::Pressed));
        assert!(state.key_down(Key::D));
        assert!(frame.pressed(Key::D));

        state.apply_event(&mut frame, key(Key::D, KeyState::Released));
        assert!(!state.key_down(Key::D));
        assert!(frame.released(Key::D));
        assert_eq!(frame.events().len(), 2);
    }

    #[test]
    fn repeated_press_is_recorded_once() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::W, KeyState::Pressed));
        frame.clear();
        state.apply_event(&mut frame, key(Key::W, KeyState::Pressed));

        assert!(state.key_down(Key::W));
        assert!(!frame.pressed(Key::W));
        assert_eq!(frame.events().len(), 1);
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::A, KeyState::Released));
        assert!(!frame.released(Key::A));
    }

    #[test]
    fn focus_loss_clears_held_keys() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::Focused(true));
        state.apply_event(&mut frame, key(Key::S, KeyState::Pressed));
        state.apply_event(&mut frame, InputEvent::Focused(false));

        assert!(!state.focused);
        assert!(state.keys_down.is_empty());
    }

    #[test]
    fn escape_press_is_detected() {
        assert!(key(Key::Escape, KeyState::Pressed).is_press_of(Key::Escape));
        assert!(!key(Key::Escape, KeyState::Released).is_press_of(Key::Escape));
        assert!(!key(Key::W, KeyState::Pressed).is_press_of(Key::Escape));
    }
}
