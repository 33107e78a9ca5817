use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};

use crate::device::{Platform, SurfaceBinding};
use crate::time::FrameClock;

use super::command::{Command, CommandCell};
use super::config::RenderConfig;
use super::drawable::{Drawable, FrameParams};

/// State shared between the owning thread and the render thread.
struct Shared<W> {
    commands: CommandCell<W>,
    running: AtomicBool,
}

/// Owns the render thread and the command cell that feeds it.
///
/// The owning thread publishes window changes and shutdown; the render thread
/// binds surfaces and renders continuously. Only the most recent command is
/// kept: a window change published before the render thread picks up the
/// previous one replaces it, and a shutdown replaces a pending window change.
///
/// `W` is the host window reference type (`Platform::Window` of the platform
/// the thread is started with).
pub struct RenderThread<W: Send + 'static> {
    shared: Arc<Shared<W>>,
    config: RenderConfig,
    handle: Option<JoinHandle<()>>,
    started: bool,
}

impl<W: Send + 'static> RenderThread<W> {
    pub fn new(config: RenderConfig) -> Self {
        log::info!("render thread controller created");
        Self {
            shared: Arc::new(Shared {
                commands: CommandCell::new(),
                running: AtomicBool::new(false),
            }),
            config,
            handle: None,
            started: false,
        }
    }

    /// Spawns the render thread.
    ///
    /// `factory` runs on the render thread and builds the platform and payload
    /// there, so their handles never exist on the owning thread. Commands
    /// published before `start` are picked up by the first loop iteration.
    /// A controller can be started once.
    pub fn start<P, D, F>(&mut self, factory: F) -> Result<()>
    where
        P: Platform<Window = W> + 'static,
        D: Drawable<P> + 'static,
        F: FnOnce() -> (P, D) + Send + 'static,
    {
        anyhow::ensure!(!self.started, "render thread already started");

        log::info!("creating render thread");
        self.shared.running.store(true, Ordering::Release);

        let shared = Arc::clone(&self.shared);
        let config = self.config.clone();

        let spawned = thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || {
                let (platform, payload) = factory();
                Worker::new(shared, platform, payload, &config).run();
            });

        match spawned {
            Ok(handle) => {
                self.handle = Some(handle);
                self.started = true;
                Ok(())
            }
            Err(e) => {
                self.shared.running.store(false, Ordering::Release);
                Err(e).context("failed to spawn render thread")
            }
        }
    }

    /// Asks the render thread to bind a surface to `window`. Returns immediately.
    pub fn set_window(&self, window: W) {
        self.publish(Command::WindowChanged(window));
    }

    /// Asks the render thread to release its surface and exit. Returns immediately.
    pub fn request_shutdown(&self) {
        self.publish(Command::ShutdownRequested);
    }

    /// Blocks until the render thread has exited.
    ///
    /// Without a prior [`request_shutdown`](Self::request_shutdown) this waits
    /// for a shutdown published by someone else.
    pub fn join(&mut self) -> Result<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        let joined = handle.join();
        self.shared.running.store(false, Ordering::Release);

        match joined {
            Ok(()) => {
                log::info!("render thread stopped");
                Ok(())
            }
            Err(_) => anyhow::bail!("render thread panicked"),
        }
    }

    /// Publishes shutdown and waits for the render thread to exit.
    ///
    /// When this returns, the surface and context the thread owned have been
    /// released. A pending window change is dropped. No-op if not running.
    pub fn stop(&mut self) -> Result<()> {
        if self.handle.is_none() {
            return Ok(());
        }

        log::info!("stopping render thread");
        self.request_shutdown();
        self.join()
    }

    /// True from `start` until the render thread consumes a shutdown.
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    fn publish(&self, command: Command<W>) {
        let name = command.name();
        let displaced = self.shared.commands.publish(command);
        if !displaced.is_none() {
            log::debug!("{} command dropped, replaced by {name}", displaced.name());
        }

        if let Some(handle) = &self.handle {
            handle.thread().unpark();
        }
    }
}

impl<W: Send + 'static> Drop for RenderThread<W> {
    fn drop(&mut self) {
        if self.handle.is_some() {
            log::warn!("render thread controller dropped while running; stopping");
            if let Err(e) = self.stop() {
                log::error!("{e:#}");
            }
        }
    }
}

/// Render-thread side: everything here lives and dies on the worker.
struct Worker<P: Platform, D> {
    shared: Arc<Shared<P::Window>>,
    binding: SurfaceBinding<P>,
    payload: D,
    angle: f32,
    angle_step: f32,
    clock: FrameClock,
    idle_wait: std::time::Duration,
}

impl<P, D> Worker<P, D>
where
    P: Platform,
    D: Drawable<P>,
{
    fn new(shared: Arc<Shared<P::Window>>, platform: P, payload: D, config: &RenderConfig) -> Self {
        Self {
            shared,
            binding: SurfaceBinding::new(platform, config.attribs),
            payload,
            angle: 0.0,
            angle_step: config.angle_step,
            clock: FrameClock::new(),
            idle_wait: config.idle_wait,
        }
    }

    fn run(mut self) {
        log::info!("render loop entered");

        let mut running = true;
        while running {
            match self.shared.commands.take() {
                Command::WindowChanged(window) => self.bind(window),
                Command::ShutdownRequested => {
                    running = false;
                    self.shared.running.store(false, Ordering::Release);
                    self.binding.release();
                }
                Command::None => {}
            }

            if !running {
                break;
            }

            if self.binding.is_bound() {
                self.render_frame();
            } else {
                thread::park_timeout(self.idle_wait);
            }
        }

        log::info!("render loop exiting");
    }

    fn bind(&mut self, window: P::Window) {
        match self.binding.bind(window) {
            Ok(_) => self.clock.reset(),
            Err(e) => log::error!("failed to bind surface: {e}"),
        }
    }

    fn render_frame(&mut self) {
        self.angle += self.angle_step;

        let frame = FrameParams {
            angle: self.angle,
            time: self.clock.tick(),
        };

        let payload = &mut self.payload;
        if let Err(e) = self
            .binding
            .present_frame(|context| payload.draw(context, &frame))
        {
            log::error!("failed to present frame: {e}");
        }
    }
}
