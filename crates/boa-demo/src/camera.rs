use boa::input::{InputState, Key};
use glam::{Mat4, Vec2, Vec3};

/// 2D camera moved with W/A/S/D.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pos: Vec2,
    step: f32,
}

impl Camera {
    pub fn new(step: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            step,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    /// Moves one step for every direction key currently held.
    /// Opposite keys cancel out.
    pub fn apply_held_keys(&mut self, input: &InputState) {
        if input.key_down(Key::W) {
            self.pos.y += self.step;
        }
        if input.key_down(Key::A) {
            self.pos.x -= self.step;
        }
        if input.key_down(Key::S) {
            self.pos.y -= self.step;
        }
        if input.key_down(Key::D) {
            self.pos.x += self.step;
        }
    }

    /// View transform: a translation by the camera position.
    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(self.pos.x, self.pos.y, 0.0))
    }
}
