//! Raster and clip-space geometry derived from a bound surface.
//!
//! Conventions follow the classic fixed-function pipeline:
//! - viewport in physical pixels, origin bottom-left
//! - right-handed eye space looking down -Z
//! - clip-space depth in [-1, 1]; backends with a [0, 1] depth range correct it themselves

mod frustum;
mod viewport;

pub use frustum::Frustum;
pub use viewport::Viewport;
