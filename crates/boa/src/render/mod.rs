//! Per-frame rendering handles.
//!
//! The frame context opens one render pass per frame (color + depth cleared) and
//! hands it to application code together with a [`RenderCtx`].

mod ctx;

pub use ctx::{RenderCtx, Viewport};
