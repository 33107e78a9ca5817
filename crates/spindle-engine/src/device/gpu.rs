use crate::render::{RenderCtx, RenderTarget};

use super::error::PlatformError;
use super::frame::GpuFrame;
use super::init::GpuInit;
use super::platform::{ConfigAttribs, Platform};
use super::state::RenderState;
use super::surface::{self, SurfaceErrorAction};
use super::window::NativeWindow;

/// wgpu implementation of [`Platform`].
///
/// Call mapping:
/// - display: a `wgpu::Instance`; `initialize` selects the adapter
/// - config: a render-attachment color format with enough bits per channel
/// - surface: a `wgpu::Surface` created from the host's raw handles
/// - context: device + queue; `make_current` configures the swapchain
/// - `begin_frame` acquires the next swapchain image, `swap_buffers` submits and presents
pub struct WgpuPlatform {
    init: GpuInit,
}

impl WgpuPlatform {
    pub fn new(init: GpuInit) -> Self {
        Self { init }
    }
}

impl Default for WgpuPlatform {
    fn default() -> Self {
        Self::new(GpuInit::default())
    }
}

pub struct WgpuDisplay {
    instance: wgpu::Instance,
    adapter: Option<wgpu::Adapter>,
}

impl WgpuDisplay {
    fn adapter(&self) -> Result<&wgpu::Adapter, PlatformError> {
        self.adapter
            .as_ref()
            .ok_or_else(|| PlatformError::detail("display is not initialized"))
    }
}

#[derive(Debug, Copy, Clone)]
pub struct WgpuConfig {
    format: wgpu::TextureFormat,
}

pub struct WgpuSurface {
    surface: wgpu::Surface<'static>,
    size: (u32, u32),
    config: Option<wgpu::SurfaceConfiguration>,
}

/// Device, queue and the in-flight frame. This is what payloads draw with.
pub struct GpuContext {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_format: wgpu::TextureFormat,
    state: Option<RenderState>,
    frame: Option<GpuFrame>,
}

impl GpuContext {
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    pub fn render_state(&self) -> Option<&RenderState> {
        self.state.as_ref()
    }

    /// Renderer context and target for the frame in flight.
    ///
    /// `None` outside `begin_frame`/`swap_buffers` or before the viewport is configured.
    pub fn target(&mut self) -> Option<(RenderCtx<'_>, RenderTarget<'_>)> {
        let state = self.state.as_ref()?;
        let frame = self.frame.as_mut()?;

        Some((
            RenderCtx::new(&self.device, &self.queue, self.surface_format, state),
            RenderTarget::new(&mut frame.encoder, &frame.view),
        ))
    }
}

impl Platform for WgpuPlatform {
    type Window = NativeWindow;
    type Display = WgpuDisplay;
    type Config = WgpuConfig;
    type Format = wgpu::TextureFormat;
    type Surface = WgpuSurface;
    type Context = GpuContext;

    fn get_display(&mut self) -> Result<WgpuDisplay, PlatformError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        Ok(WgpuDisplay {
            instance,
            adapter: None,
        })
    }

    fn initialize(&mut self, display: &mut WgpuDisplay) -> Result<(), PlatformError> {
        let adapter = pollster::block_on(display.instance.request_adapter(
            &wgpu::RequestAdapterOptions {
                power_preference: self.init.power_preference,
                compatible_surface: None,
                force_fallback_adapter: false,
            },
        ))
        .map_err(|e| PlatformError::detail(e.to_string()))?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        display.adapter = Some(adapter);
        Ok(())
    }

    fn choose_config(
        &mut self,
        display: &WgpuDisplay,
        attribs: &ConfigAttribs,
    ) -> Result<Option<WgpuConfig>, PlatformError> {
        let adapter = display.adapter()?;

        let format = surface::choose_color_format(attribs, self.init.prefer_srgb, |format| {
            adapter
                .get_texture_format_features(format)
                .allowed_usages
                .contains(wgpu::TextureUsages::RENDER_ATTACHMENT)
        });

        Ok(format.map(|format| WgpuConfig { format }))
    }

    fn native_format(
        &mut self,
        _display: &WgpuDisplay,
        config: &WgpuConfig,
    ) -> Result<wgpu::TextureFormat, PlatformError> {
        Ok(config.format)
    }

    /// wgpu applies the format to the window's buffers when the swapchain is
    /// configured in `make_current`.
    fn apply_format(&mut self, _window: &NativeWindow, format: wgpu::TextureFormat) {
        log::debug!("window buffers will use {format:?}");
    }

    fn create_surface(
        &mut self,
        display: &WgpuDisplay,
        _config: &WgpuConfig,
        window: &NativeWindow,
    ) -> Result<WgpuSurface, PlatformError> {
        let adapter = display.adapter()?;

        // SAFETY: `NativeWindow::from_host` obliges the host to keep the window
        // alive until the render thread stops, which outlives this surface.
        let target = unsafe { wgpu::SurfaceTargetUnsafe::from_window(window) }
            .map_err(|e| PlatformError::detail(e.to_string()))?;
        let surface = unsafe { display.instance.create_surface_unsafe(target) }
            .map_err(|e| PlatformError::detail(e.to_string()))?;

        if !adapter.is_surface_supported(&surface) {
            return Err(PlatformError::detail("adapter cannot present to this window"));
        }

        Ok(WgpuSurface {
            surface,
            size: window.size(),
            config: None,
        })
    }

    fn create_context(
        &mut self,
        display: &WgpuDisplay,
        config: &WgpuConfig,
    ) -> Result<GpuContext, PlatformError> {
        let adapter = display.adapter()?;

        let required_limits = self.init.required_limits.clone().unwrap_or_else(|| {
            wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits())
        });

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("spindle device"),
            required_features: self.init.required_features,
            required_limits,
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        }))
        .map_err(|e| PlatformError::detail(e.to_string()))?;

        Ok(GpuContext {
            device,
            queue,
            surface_format: config.format,
            state: None,
            frame: None,
        })
    }

    fn make_current(
        &mut self,
        display: &WgpuDisplay,
        surface: &mut WgpuSurface,
        context: &mut GpuContext,
    ) -> Result<(), PlatformError> {
        let (width, height) = surface.size;
        if width == 0 || height == 0 {
            // wgpu cannot configure an empty swapchain; `query_size` reports the
            // zero extent and the acquisition is rejected there.
            surface.config = None;
            return Ok(());
        }

        let caps = surface.surface.get_capabilities(display.adapter()?);
        if !caps.formats.contains(&context.surface_format) {
            return Err(PlatformError::detail(format!(
                "surface does not support {:?}",
                context.surface_format
            )));
        }

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: context.surface_format,
            width,
            height,
            present_mode: self.init.present_mode,
            alpha_mode: surface::choose_alpha_mode(&caps, self.init.alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency: self.init.desired_maximum_frame_latency,
        };

        surface.surface.configure(&context.device, &config);
        surface.config = Some(config);
        Ok(())
    }

    fn query_size(
        &mut self,
        _display: &WgpuDisplay,
        surface: &WgpuSurface,
    ) -> Result<(u32, u32), PlatformError> {
        Ok(surface
            .config
            .as_ref()
            .map_or(surface.size, |config| (config.width, config.height)))
    }

    fn apply_render_state(&mut self, context: &mut GpuContext, state: &RenderState) {
        context.state = Some(state.clone());
    }

    fn begin_frame(
        &mut self,
        _display: &WgpuDisplay,
        surface: &mut WgpuSurface,
        context: &mut GpuContext,
    ) -> Result<(), PlatformError> {
        let Some(config) = surface.config.as_ref() else {
            return Err(PlatformError::detail("surface is not configured"));
        };

        let surface_texture = match surface.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(err) => {
                let action =
                    surface::recover_from_error(&surface.surface, &context.device, config, &err);
                if action == SurfaceErrorAction::Fatal {
                    log::error!("swapchain acquisition failed fatally: {err}");
                }
                return Err(PlatformError::detail(format!("{err} ({action:?})")));
            }
        };

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("spindle frame encoder"),
            });

        context.frame = Some(GpuFrame {
            surface_texture,
            view,
            encoder,
        });
        Ok(())
    }

    fn swap_buffers(
        &mut self,
        _display: &WgpuDisplay,
        _surface: &mut WgpuSurface,
        context: &mut GpuContext,
    ) -> Result<(), PlatformError> {
        let GpuFrame {
            surface_texture,
            view,
            encoder,
        } = context
            .frame
            .take()
            .ok_or_else(|| PlatformError::detail("no frame in flight"))?;

        context.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        surface_texture.present();
        Ok(())
    }

    fn release_current(
        &mut self,
        _display: &WgpuDisplay,
        _surface: &mut WgpuSurface,
        context: &mut GpuContext,
    ) {
        // An acquired but unpresented image is discarded.
        context.frame = None;
        context.state = None;
    }

    fn destroy_context(&mut self, _display: &WgpuDisplay, context: GpuContext) {
        log::debug!("destroying device");
        drop(context);
    }

    fn destroy_surface(&mut self, _display: &WgpuDisplay, surface: WgpuSurface) {
        log::debug!("destroying surface");
        drop(surface);
    }

    fn terminate(&mut self, display: WgpuDisplay) {
        drop(display);
    }
}
