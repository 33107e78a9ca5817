use glam::{Mat4, Vec4};

/// Perspective clipping volume, specified like `glFrustum`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frustum {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl Frustum {
    pub const NEAR: f32 = 1.0;
    pub const FAR: f32 = 10.0;
    /// Vertical half-extent at the near plane.
    pub const HALF_HEIGHT: f32 = 1.0;

    /// Fixed near/far volume whose horizontal extent is scaled by `aspect`.
    pub fn for_aspect(aspect: f32) -> Self {
        Self {
            left: -aspect * Self::HALF_HEIGHT,
            right: aspect * Self::HALF_HEIGHT,
            bottom: -Self::HALF_HEIGHT,
            top: Self::HALF_HEIGHT,
            near: Self::NEAR,
            far: Self::FAR,
        }
    }

    /// Projection matrix mapping eye space to clip space with depth in [-1, 1].
    pub fn projection(&self) -> Mat4 {
        let Self {
            left: l,
            right: r,
            bottom: b,
            top: t,
            near: n,
            far: f,
        } = *self;

        Mat4::from_cols(
            Vec4::new(2.0 * n / (r - l), 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 * n / (t - b), 0.0, 0.0),
            Vec4::new((r + l) / (r - l), (t + b) / (t - b), -(f + n) / (f - n), -1.0),
            Vec4::new(0.0, 0.0, -2.0 * f * n / (f - n), 0.0),
        )
    }
}
