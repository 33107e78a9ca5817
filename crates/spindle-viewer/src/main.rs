use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use spindle_engine::device::{GpuInit, NativeWindow, WgpuPlatform};
use spindle_engine::logging::{LoggingConfig, init_logging};
use spindle_engine::render::{RenderConfig, RenderThread, SpinningCube};

/// Host window configuration.
#[derive(Debug, Clone)]
struct ViewerConfig {
    title: String,
    initial_size: LogicalSize<f64>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "spindle".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
        }
    }
}

/// Host windowing layer: owns the window, forwards its lifecycle to the render thread.
struct Viewer {
    config: ViewerConfig,
    // Declared before `window` so the render thread stops before the window drops.
    renderer: RenderThread<NativeWindow>,
    window: Option<Window>,
}

impl Viewer {
    fn new(config: ViewerConfig, renderer: RenderThread<NativeWindow>) -> Self {
        Self {
            config,
            renderer,
            window: None,
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            // The bound surface keeps the size it was created with.
            .with_resizable(false);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let size = window.inner_size();
        // SAFETY: the window is stored in `self.window` and dropped only after
        // `shutdown` has stopped the render thread.
        let native = unsafe { NativeWindow::from_host(&window, size.width, size.height) }
            .context("window has no usable native handle")?;

        log::info!("window created ({}x{})", size.width, size.height);
        self.renderer.set_window(native);
        self.window = Some(window);
        Ok(())
    }

    /// Stops the render thread, then releases the window it was drawing into.
    fn shutdown(&mut self) -> Result<()> {
        self.renderer.stop()?;
        self.window = None;
        Ok(())
    }
}

impl ApplicationHandler for Viewer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.create_window(event_loop) {
            log::error!("{e:#}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                if let Err(e) = self.shutdown() {
                    log::error!("{e:#}");
                }
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                log::debug!("window resized to {}x{}", size.width, size.height);
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Err(e) = self.shutdown() {
            log::error!("{e:#}");
        }
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut renderer = RenderThread::new(RenderConfig::default());
    renderer.start(|| (WgpuPlatform::new(GpuInit::default()), SpinningCube::new()))?;

    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut viewer = Viewer::new(ViewerConfig::default(), renderer);
    event_loop
        .run_app(&mut viewer)
        .context("winit event loop terminated with error")?;

    viewer.shutdown()
}
