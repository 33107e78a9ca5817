use crate::coords::{Frustum, Viewport};

/// Interpolation of vertex attributes across a primitive.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShadeModel {
    Flat,
    Smooth,
}

/// Quality/speed trade-off for perspective-correct interpolation.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Hint {
    Fastest,
    Nicest,
    DontCare,
}

/// Fixed-function state applied to a context right after it is bound.
///
/// Everything here is derived from the surface dimensions; payloads read it
/// through their context and never change it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    pub viewport: Viewport,
    pub frustum: Frustum,
    pub dither: bool,
    pub perspective_hint: Hint,
    pub cull_back_faces: bool,
    /// Requested depth testing. The wgpu backend attaches no depth buffer;
    /// a payload that needs one creates and clears its own.
    pub depth_test: bool,
    pub shading: ShadeModel,
    pub clear_color: [f32; 4],
}

impl RenderState {
    /// State for a full-surface viewport of `width` x `height` pixels.
    ///
    /// Callers must reject zero dimensions first; the aspect ratio is undefined there.
    pub fn for_surface(width: u32, height: u32) -> Self {
        let viewport = Viewport::full(width, height);
        debug_assert!(viewport.is_valid());

        Self {
            viewport,
            frustum: Frustum::for_aspect(viewport.aspect_ratio()),
            dither: false,
            perspective_hint: Hint::Fastest,
            cull_back_faces: true,
            depth_test: true,
            shading: ShadeModel::Smooth,
            clear_color: [0.0, 0.0, 0.0, 0.0],
        }
    }

    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        self.viewport.aspect_ratio()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_state_covers_the_whole_surface() {
        let state = RenderState::for_surface(1080, 1920);
        assert_eq!(state.viewport, Viewport::full(1080, 1920));
        assert_eq!(state.aspect_ratio(), 1080.0 / 1920.0);
        assert_eq!(state.frustum, Frustum::for_aspect(1080.0 / 1920.0));
    }

    #[test]
    fn surface_state_fixed_function_defaults() {
        let state = RenderState::for_surface(640, 480);
        assert!(!state.dither);
        assert!(state.cull_back_faces);
        assert!(state.depth_test);
        assert_eq!(state.shading, ShadeModel::Smooth);
        assert_eq!(state.perspective_hint, Hint::Fastest);
        assert_eq!(state.clear_color, [0.0; 4]);
    }
}
