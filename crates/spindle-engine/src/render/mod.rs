//! Render thread and per-frame payloads.
//!
//! The owning thread talks to [`RenderThread`] only through the single-slot
//! command cell; the surface binding, payload and animation state live on the
//! render thread.

mod command;
mod config;
mod controller;
mod ctx;
mod cube;
mod drawable;

pub use command::Command;
pub use config::RenderConfig;
pub use controller::RenderThread;
pub use ctx::{RenderCtx, RenderTarget};
pub use cube::SpinningCube;
pub use drawable::{Drawable, FrameParams};
