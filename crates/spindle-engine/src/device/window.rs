use raw_window_handle::{
    DisplayHandle, HandleError, HasDisplayHandle, HasWindowHandle, RawDisplayHandle,
    RawWindowHandle, WindowHandle,
};

/// Host window reference handed to the render thread.
///
/// Carries the raw window/display handles plus the drawable size in physical
/// pixels at the time it was published. The host windowing layer keeps
/// ownership of the window; this type never destroys anything.
#[derive(Debug, Copy, Clone)]
pub struct NativeWindow {
    window: RawWindowHandle,
    display: RawDisplayHandle,
    width: u32,
    height: u32,
}

// SAFETY: the raw handles are plain identifiers; the only dereference happens
// on the render thread during surface creation, and `from_host` obliges the
// host to keep the window alive until the render thread has stopped.
unsafe impl Send for NativeWindow {}

impl NativeWindow {
    /// Captures the handles of a host window.
    ///
    /// # Safety
    ///
    /// The window must stay alive until the render thread it is published to
    /// has been stopped (or has bound a different window and been stopped).
    pub unsafe fn from_host<W>(host: &W, width: u32, height: u32) -> Result<Self, HandleError>
    where
        W: HasWindowHandle + HasDisplayHandle + ?Sized,
    {
        Ok(Self {
            window: host.window_handle()?.as_raw(),
            display: host.display_handle()?.as_raw(),
            width,
            height,
        })
    }

    /// Drawable size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl HasWindowHandle for NativeWindow {
    fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
        // SAFETY: validity is guaranteed by the `from_host` contract.
        Ok(unsafe { WindowHandle::borrow_raw(self.window) })
    }
}

impl HasDisplayHandle for NativeWindow {
    fn display_handle(&self) -> Result<DisplayHandle<'_>, HandleError> {
        // SAFETY: validity is guaranteed by the `from_host` contract.
        Ok(unsafe { DisplayHandle::borrow_raw(self.display) })
    }
}
