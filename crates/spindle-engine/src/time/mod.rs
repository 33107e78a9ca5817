//! Frame timing for the render loop.
//!
//! The render thread owns one `FrameClock`, resets it whenever a new surface is
//! bound and ticks it once per presented frame.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
