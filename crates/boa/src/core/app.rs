use crate::device::Gpu;
use crate::input::{InputEvent, InputState};

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by [`Runtime::run`](crate::window::Runtime::run).
pub trait App {
    /// Called once, after the window and its GPU context exist and before the
    /// first frame. Create pipelines, upload geometry and load textures here.
    ///
    /// An error stops the runtime and is returned from `run`.
    fn on_start(&mut self, gpu: &Gpu<'_>) -> anyhow::Result<()> {
        let _ = gpu;
        Ok(())
    }

    /// Called for every translated input event, after `input` has been updated.
    fn on_input(&mut self, event: &InputEvent, input: &InputState) -> AppControl {
        let _ = (event, input);
        AppControl::Continue
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called once when the runtime shuts down, before GPU resources are dropped.
    fn on_exit(&mut self) {}
}
