//! Core engine-facing contracts.
//!
//! The interface between the window runtime and application code: lifecycle
//! hooks plus the context handed to each frame.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
