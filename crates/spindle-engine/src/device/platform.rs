use std::fmt;

use super::error::PlatformError;
use super::state::RenderState;

/// Minimum attributes a surface configuration must satisfy.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ConfigAttribs {
    /// The configuration must be presentable to a window.
    pub window_surface: bool,
    pub red_bits: u8,
    pub green_bits: u8,
    pub blue_bits: u8,
}

impl ConfigAttribs {
    /// Returns true when a format with the given channel depths satisfies these attributes.
    pub fn accepts(&self, red: u8, green: u8, blue: u8) -> bool {
        red >= self.red_bits && green >= self.green_bits && blue >= self.blue_bits
    }
}

impl Default for ConfigAttribs {
    fn default() -> Self {
        Self {
            window_surface: true,
            red_bits: 8,
            green_bits: 8,
            blue_bits: 8,
        }
    }
}

impl fmt::Display for ConfigAttribs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "r{}g{}b{}{}",
            self.red_bits,
            self.green_bits,
            self.blue_bits,
            if self.window_surface { " (window)" } else { "" }
        )
    }
}

/// Graphics platform calls used to bind a surface to a native window.
///
/// Each method is one platform call. `SurfaceBinding` sequences them and owns
/// every handle they return, so an implementation never has to track which
/// resources are alive. Destruction methods take handles by value; a handle
/// that has been destroyed cannot be used again.
///
/// A platform instance lives on the render thread only and need not be `Send`.
pub trait Platform {
    /// Host-owned window reference handed over by the owning thread.
    type Window: Send + 'static;
    /// Connection to the display server.
    type Display;
    /// Chosen pixel-format configuration.
    type Config;
    /// Native pixel format derived from a configuration.
    type Format: Copy + fmt::Debug;
    /// Drawable surface bound to a window.
    type Surface;
    /// Rendering context; this is what the per-frame payload draws with.
    type Context;

    fn get_display(&mut self) -> Result<Self::Display, PlatformError>;

    fn initialize(&mut self, display: &mut Self::Display) -> Result<(), PlatformError>;

    /// Returns `Ok(None)` when the query succeeds but nothing matches `attribs`.
    fn choose_config(
        &mut self,
        display: &Self::Display,
        attribs: &ConfigAttribs,
    ) -> Result<Option<Self::Config>, PlatformError>;

    fn native_format(
        &mut self,
        display: &Self::Display,
        config: &Self::Config,
    ) -> Result<Self::Format, PlatformError>;

    /// Applies the native format to the window's buffers.
    fn apply_format(&mut self, window: &Self::Window, format: Self::Format);

    fn create_surface(
        &mut self,
        display: &Self::Display,
        config: &Self::Config,
        window: &Self::Window,
    ) -> Result<Self::Surface, PlatformError>;

    fn create_context(
        &mut self,
        display: &Self::Display,
        config: &Self::Config,
    ) -> Result<Self::Context, PlatformError>;

    /// Binds surface + context as the current rendering target.
    fn make_current(
        &mut self,
        display: &Self::Display,
        surface: &mut Self::Surface,
        context: &mut Self::Context,
    ) -> Result<(), PlatformError>;

    /// Returns `(width, height)` of the surface in physical pixels.
    fn query_size(
        &mut self,
        display: &Self::Display,
        surface: &Self::Surface,
    ) -> Result<(u32, u32), PlatformError>;

    /// Applies fixed-function state derived from the surface dimensions.
    fn apply_render_state(&mut self, context: &mut Self::Context, state: &RenderState);

    /// Prepares the surface for drawing. Platforms that draw into an implicit
    /// back buffer have nothing to do here.
    fn begin_frame(
        &mut self,
        display: &Self::Display,
        surface: &mut Self::Surface,
        context: &mut Self::Context,
    ) -> Result<(), PlatformError> {
        let _ = (display, surface, context);
        Ok(())
    }

    /// Presents the frame drawn since `begin_frame`.
    fn swap_buffers(
        &mut self,
        display: &Self::Display,
        surface: &mut Self::Surface,
        context: &mut Self::Context,
    ) -> Result<(), PlatformError>;

    /// Unbinds the current rendering target.
    fn release_current(
        &mut self,
        display: &Self::Display,
        surface: &mut Self::Surface,
        context: &mut Self::Context,
    );

    fn destroy_context(&mut self, display: &Self::Display, context: Self::Context);

    fn destroy_surface(&mut self, display: &Self::Display, surface: Self::Surface);

    /// Closes the display connection.
    fn terminate(&mut self, display: Self::Display);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_attribs_require_eight_bit_window_config() {
        let attribs = ConfigAttribs::default();
        assert!(attribs.window_surface);
        assert!(attribs.accepts(8, 8, 8));
        assert!(attribs.accepts(10, 10, 10));
        assert!(!attribs.accepts(5, 6, 5));
        assert_eq!(attribs.to_string(), "r8g8b8 (window)");
    }
}
