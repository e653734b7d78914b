//! Frame timing.
//!
//! One `FrameClock` per window; the runtime ticks it once per presented frame.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
