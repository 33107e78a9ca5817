use super::error::{AcquireError, PresentError};
use super::platform::{ConfigAttribs, Platform};
use super::state::RenderState;

/// Handles of a surface that is bound to a window and current.
pub struct BoundSurface<P: Platform> {
    display: P::Display,
    surface: P::Surface,
    context: P::Context,
    window: P::Window,
    width: u32,
    height: u32,
}

impl<P: Platform> BoundSurface<P> {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The host window this surface draws into.
    pub fn window(&self) -> &P::Window {
        &self.window
    }
}

/// Owns the surface + context bound to the current window, if any.
///
/// Lives on the render thread. Between a successful [`bind`](Self::bind) and the
/// next [`release`](Self::release) the binding holds exactly one display,
/// surface and context; otherwise it holds nothing.
pub struct SurfaceBinding<P: Platform> {
    platform: P,
    attribs: ConfigAttribs,
    bound: Option<BoundSurface<P>>,
    state: Option<RenderState>,
}

impl<P: Platform> SurfaceBinding<P> {
    pub fn new(platform: P, attribs: ConfigAttribs) -> Self {
        Self {
            platform,
            attribs,
            bound: None,
            state: None,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    pub fn surface(&self) -> Option<&BoundSurface<P>> {
        self.bound.as_ref()
    }

    /// State applied by the last [`configure_viewport`](Self::configure_viewport).
    pub fn render_state(&self) -> Option<&RenderState> {
        self.state.as_ref()
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Creates a display, surface and context for `window` and makes them current.
    ///
    /// Either every step succeeds, or everything created so far is destroyed
    /// before the error is returned. The returned surface is not installed;
    /// use [`bind`](Self::bind) for that.
    pub fn acquire(&mut self, window: P::Window) -> Result<BoundSurface<P>, AcquireError> {
        let platform = &mut self.platform;

        let mut display = platform.get_display().map_err(AcquireError::NoDisplay)?;

        let config = match select_config(platform, &mut display, &window, &self.attribs) {
            Ok(config) => config,
            Err(e) => {
                platform.terminate(display);
                return Err(e);
            }
        };

        let mut surface = match platform.create_surface(&display, &config, &window) {
            Ok(surface) => surface,
            Err(e) => {
                platform.terminate(display);
                return Err(AcquireError::CreateSurface(e));
            }
        };

        let mut context = match platform.create_context(&display, &config) {
            Ok(context) => context,
            Err(e) => {
                platform.destroy_surface(&display, surface);
                platform.terminate(display);
                return Err(AcquireError::CreateContext(e));
            }
        };

        let size = platform
            .make_current(&display, &mut surface, &mut context)
            .map_err(AcquireError::MakeCurrent)
            .and_then(|()| {
                platform
                    .query_size(&display, &surface)
                    .map_err(AcquireError::QuerySize)
            })
            .and_then(|(width, height)| {
                if width == 0 || height == 0 {
                    Err(AcquireError::InvalidDimensions { width, height })
                } else {
                    Ok((width, height))
                }
            });

        match size {
            Ok((width, height)) => Ok(BoundSurface {
                display,
                surface,
                context,
                window,
                width,
                height,
            }),
            Err(e) => {
                platform.release_current(&display, &mut surface, &mut context);
                platform.destroy_context(&display, context);
                platform.destroy_surface(&display, surface);
                platform.terminate(display);
                Err(e)
            }
        }
    }

    /// Acquires a surface for `window`, installs it and configures its viewport.
    ///
    /// A previously bound surface is destroyed only once the new one is current.
    /// On failure the previous binding (or lack of one) is left as it was.
    pub fn bind(&mut self, window: P::Window) -> Result<&RenderState, AcquireError> {
        let next = self.acquire(window)?;
        let (width, height) = (next.width, next.height);

        if let Some(prev) = self.bound.replace(next) {
            log::debug!("retiring previous surface ({}x{})", prev.width, prev.height);
            destroy(&mut self.platform, prev, false);
        }

        self.configure_viewport(width, height)
    }

    /// Derives full-surface viewport state and applies it to the bound context.
    pub fn configure_viewport(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<&RenderState, AcquireError> {
        if width == 0 || height == 0 {
            return Err(AcquireError::InvalidDimensions { width, height });
        }

        let state = RenderState::for_surface(width, height);
        if let Some(bound) = self.bound.as_mut() {
            self.platform.apply_render_state(&mut bound.context, &state);
        }

        log::info!(
            "context initialized: {width}x{height}, aspect {:.3}",
            state.aspect_ratio()
        );

        Ok(&*self.state.insert(state))
    }

    /// Runs `draw` against the bound context, then presents the surface.
    ///
    /// Does nothing when no surface is bound.
    pub fn present_frame<F>(&mut self, draw: F) -> Result<(), PresentError>
    where
        F: FnOnce(&mut P::Context),
    {
        let Some(bound) = self.bound.as_mut() else {
            return Ok(());
        };

        self.platform
            .begin_frame(&bound.display, &mut bound.surface, &mut bound.context)
            .map_err(PresentError::BeginFrame)?;

        draw(&mut bound.context);

        self.platform
            .swap_buffers(&bound.display, &mut bound.surface, &mut bound.context)
            .map_err(PresentError::Swap)
    }

    /// Unbinds and destroys the context, surface and display. No-op when unbound.
    pub fn release(&mut self) {
        self.state = None;

        if let Some(bound) = self.bound.take() {
            log::info!("destroying context");
            destroy(&mut self.platform, bound, true);
        }
    }
}

impl<P: Platform> Drop for SurfaceBinding<P> {
    fn drop(&mut self) {
        self.release();
    }
}

fn select_config<P: Platform>(
    platform: &mut P,
    display: &mut P::Display,
    window: &P::Window,
    attribs: &ConfigAttribs,
) -> Result<P::Config, AcquireError> {
    platform
        .initialize(display)
        .map_err(AcquireError::Initialize)?;

    let config = platform
        .choose_config(display, attribs)
        .map_err(AcquireError::ChooseConfig)?
        .ok_or(AcquireError::NoMatchingConfig(*attribs))?;

    let format = platform
        .native_format(display, &config)
        .map_err(AcquireError::FormatQuery)?;
    platform.apply_format(window, format);

    Ok(config)
}

/// Destroys a surface in reverse creation order. `unbind` is false when the
/// surface is no longer current (another one was made current after it).
fn destroy<P: Platform>(platform: &mut P, bound: BoundSurface<P>, unbind: bool) {
    let BoundSurface {
        display,
        mut surface,
        mut context,
        ..
    } = bound;

    if unbind {
        platform.release_current(&display, &mut surface, &mut context);
    }
    platform.destroy_context(&display, context);
    platform.destroy_surface(&display, surface);
    platform.terminate(display);
}
