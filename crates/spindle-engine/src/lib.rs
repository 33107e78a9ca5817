//! Spindle engine crate.
//!
//! A render thread that owns a drawable surface and renders into it
//! continuously, while the host's UI thread hands it window changes and
//! shutdown through a single-slot command cell.

pub mod coords;
pub mod device;
pub mod logging;
pub mod render;
pub mod time;
