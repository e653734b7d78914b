use std::collections::HashSet;

use super::types::{InputEvent, Key, KeyState};

/// Key transitions and raw events seen since the previous frame.
///
/// Filled by [`InputState::apply_event`](super::InputState::apply_event) and
/// cleared by the runtime after each `on_frame`. Use it for edge-triggered
/// actions; use `InputState` for held keys.
#[derive(Debug, Default)]
pub struct InputFrame {
    events: Vec<InputEvent>,
    pressed: HashSet<Key>,
    released: HashSet<Key>,
}

impl InputFrame {
    /// Events in arrival order.
    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }

    /// Whether `key` went down during this frame.
    pub fn pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Whether `key` went up during this frame.
    pub fn released(&self, key: Key) -> bool {
        self.released.contains(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.pressed.clear();
        self.released.clear();
    }

    pub(crate) fn record_transition(&mut self, key: Key, state: KeyState) {
        match state {
            KeyState::Pressed => self.pressed.insert(key),
            KeyState::Released => self.released.insert(key),
        };
    }

    pub(crate) fn record_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }
}
