//! Recording platform used by the binding and render-thread tests.
//!
//! Every handle it hands out is tracked in a shared [`Journal`] so tests on
//! the owning thread can observe what the render thread created and destroyed.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use super::error::PlatformError;
use super::platform::{ConfigAttribs, Platform};
use super::state::RenderState;

/// Platform call that can be made to fail.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Step {
    GetDisplay,
    Initialize,
    ChooseConfig,
    /// `choose_config` succeeds but reports no match.
    NoMatchingConfig,
    NativeFormat,
    CreateSurface,
    CreateContext,
    MakeCurrent,
    QuerySize,
    BeginFrame,
    Swap,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub(crate) enum Handle {
    Display(u32),
    Surface(u32),
    Context(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct FakeWindow {
    pub id: u32,
    pub width: u32,
    pub height: u32,
    pub valid: bool,
}

impl FakeWindow {
    pub fn new(id: u32, width: u32, height: u32) -> Self {
        Self {
            id,
            width,
            height,
            valid: true,
        }
    }

    /// A handle the platform refuses to create a surface for.
    pub fn invalid(id: u32) -> Self {
        Self {
            valid: false,
            ..Self::new(id, 640, 480)
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Journal {
    pub live: BTreeSet<Handle>,
    pub destroyed: Vec<Handle>,
    /// Window ids passed to `create_surface`, including failed attempts.
    pub surface_requests: Vec<u32>,
    pub applied_states: Vec<RenderState>,
    pub released_current: u32,
    /// `begin_frame` calls, including failed ones.
    pub frames_begun: u32,
    pub presented: u32,
}

pub(crate) struct FakeDisplay {
    id: u32,
}

pub(crate) struct FakeSurface {
    id: u32,
    size: (u32, u32),
}

pub(crate) struct FakeContext {
    id: u32,
    pub draws: u32,
}

pub(crate) struct FakePlatform {
    journal: Arc<Mutex<Journal>>,
    fail_at: Option<Step>,
    next_id: u32,
}

impl FakePlatform {
    pub const ERROR_CODE: i32 = 0x3003;

    pub fn new() -> Self {
        Self {
            journal: Arc::default(),
            fail_at: None,
            next_id: 1,
        }
    }

    pub fn failing_at(step: Step) -> Self {
        Self {
            fail_at: Some(step),
            ..Self::new()
        }
    }

    pub fn journal(&self) -> Arc<Mutex<Journal>> {
        Arc::clone(&self.journal)
    }

    fn check(&self, step: Step) -> Result<(), PlatformError> {
        if self.fail_at == Some(step) {
            Err(PlatformError::code(Self::ERROR_CODE))
        } else {
            Ok(())
        }
    }

    fn create(&mut self, make: fn(u32) -> Handle) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.journal.lock().unwrap().live.insert(make(id));
        id
    }

    fn destroy(&mut self, handle: Handle) {
        let mut journal = self.journal.lock().unwrap();
        assert!(journal.live.remove(&handle), "double destroy of {handle:?}");
        journal.destroyed.push(handle);
    }
}

impl Platform for FakePlatform {
    type Window = FakeWindow;
    type Display = FakeDisplay;
    type Config = u32;
    type Format = u32;
    type Surface = FakeSurface;
    type Context = FakeContext;

    fn get_display(&mut self) -> Result<FakeDisplay, PlatformError> {
        self.check(Step::GetDisplay)?;
        let id = self.create(Handle::Display);
        Ok(FakeDisplay { id })
    }

    fn initialize(&mut self, _display: &mut FakeDisplay) -> Result<(), PlatformError> {
        self.check(Step::Initialize)
    }

    fn choose_config(
        &mut self,
        _display: &FakeDisplay,
        attribs: &ConfigAttribs,
    ) -> Result<Option<u32>, PlatformError> {
        self.check(Step::ChooseConfig)?;
        if self.fail_at == Some(Step::NoMatchingConfig) || !attribs.accepts(8, 8, 8) {
            return Ok(None);
        }
        Ok(Some(1))
    }

    fn native_format(
        &mut self,
        _display: &FakeDisplay,
        config: &u32,
    ) -> Result<u32, PlatformError> {
        self.check(Step::NativeFormat)?;
        Ok(*config)
    }

    fn apply_format(&mut self, _window: &FakeWindow, _format: u32) {}

    fn create_surface(
        &mut self,
        _display: &FakeDisplay,
        _config: &u32,
        window: &FakeWindow,
    ) -> Result<FakeSurface, PlatformError> {
        self.journal.lock().unwrap().surface_requests.push(window.id);
        self.check(Step::CreateSurface)?;
        if !window.valid {
            return Err(PlatformError::code(0x300B));
        }
        let id = self.create(Handle::Surface);
        Ok(FakeSurface {
            id,
            size: (window.width, window.height),
        })
    }

    fn create_context(
        &mut self,
        _display: &FakeDisplay,
        _config: &u32,
    ) -> Result<FakeContext, PlatformError> {
        self.check(Step::CreateContext)?;
        let id = self.create(Handle::Context);
        Ok(FakeContext { id, draws: 0 })
    }

    fn make_current(
        &mut self,
        _display: &FakeDisplay,
        _surface: &mut FakeSurface,
        _context: &mut FakeContext,
    ) -> Result<(), PlatformError> {
        self.check(Step::MakeCurrent)
    }

    fn query_size(
        &mut self,
        _display: &FakeDisplay,
        surface: &FakeSurface,
    ) -> Result<(u32, u32), PlatformError> {
        self.check(Step::QuerySize)?;
        Ok(surface.size)
    }

    fn apply_render_state(&mut self, _context: &mut FakeContext, state: &RenderState) {
        self.journal.lock().unwrap().applied_states.push(state.clone());
    }

    fn begin_frame(
        &mut self,
        _display: &FakeDisplay,
        _surface: &mut FakeSurface,
        _context: &mut FakeContext,
    ) -> Result<(), PlatformError> {
        self.journal.lock().unwrap().frames_begun += 1;
        self.check(Step::BeginFrame)
    }

    fn swap_buffers(
        &mut self,
        _display: &FakeDisplay,
        _surface: &mut FakeSurface,
        _context: &mut FakeContext,
    ) -> Result<(), PlatformError> {
        self.check(Step::Swap)?;
        self.journal.lock().unwrap().presented += 1;
        Ok(())
    }

    fn release_current(
        &mut self,
        _display: &FakeDisplay,
        _surface: &mut FakeSurface,
        _context: &mut FakeContext,
    ) {
        self.journal.lock().unwrap().released_current += 1;
    }

    fn destroy_context(&mut self, _display: &FakeDisplay, context: FakeContext) {
        self.destroy(Handle::Context(context.id));
    }

    fn destroy_surface(&mut self, _display: &FakeDisplay, surface: FakeSurface) {
        self.destroy(Handle::Surface(surface.id));
    }

    fn terminate(&mut self, display: FakeDisplay) {
        self.destroy(Handle::Display(display.id));
    }
}
