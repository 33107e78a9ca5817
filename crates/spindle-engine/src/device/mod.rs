//! Surface + context management.
//!
//! This module is responsible for:
//! - the `Platform` seam over the graphics API's surface/context calls
//! - `SurfaceBinding`, which sequences those calls transactionally
//! - the wgpu backend and the host window handle it binds to

mod binding;
mod error;
mod frame;
mod gpu;
mod init;
mod platform;
mod state;
mod surface;
mod window;

#[cfg(test)]
pub(crate) mod fake;

pub use binding::{BoundSurface, SurfaceBinding};
pub use error::{AcquireError, PlatformError, PresentError};
pub use frame::GpuFrame;
pub use gpu::{GpuContext, WgpuConfig, WgpuDisplay, WgpuPlatform, WgpuSurface};
pub use init::GpuInit;
pub use platform::{ConfigAttribs, Platform};
pub use state::{Hint, RenderState, ShadeModel};
pub use window::NativeWindow;
