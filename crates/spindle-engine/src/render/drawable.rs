use glam::{Mat4, Vec3};

use crate::device::Platform;
use crate::time::FrameTime;

/// Per-frame input handed to a [`Drawable`].
#[derive(Debug, Copy, Clone)]
pub struct FrameParams {
    /// Animation phase in degrees. Advances by a fixed step per rendered frame.
    pub angle: f32,
    pub time: FrameTime,
}

impl FrameParams {
    /// Distance from the eye to the model origin along -Z.
    pub const MODEL_DISTANCE: f32 = 3.0;

    /// Model transform: pushed back along -Z, spun about the vertical axis by
    /// `angle` and tumbled about the horizontal axis at a quarter of that rate.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, -Self::MODEL_DISTANCE))
            * Mat4::from_rotation_y(self.angle.to_radians())
            * Mat4::from_rotation_x((self.angle * 0.25).to_radians())
    }
}

/// Per-frame rendering payload.
///
/// Called on the render thread between frame acquisition and presentation,
/// with the bound context. The surface and viewport are already set up; a
/// payload must not rebind or release them.
pub trait Drawable<P: Platform> {
    fn draw(&mut self, context: &mut P::Context, frame: &FrameParams);
}

impl<P, F> Drawable<P> for F
where
    P: Platform,
    F: FnMut(&mut P::Context, &FrameParams),
{
    fn draw(&mut self, context: &mut P::Context, frame: &FrameParams) {
        self(context, frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::FrameClock;
    use glam::Vec4;

    fn params(angle: f32) -> FrameParams {
        FrameParams {
            angle,
            time: FrameClock::new().tick(),
        }
    }

    #[test]
    fn zero_angle_only_translates() {
        let origin = params(0.0).model_matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(origin, Vec4::new(0.0, 0.0, -3.0, 1.0));
    }

    #[test]
    fn quarter_turn_about_vertical_axis() {
        let m = params(90.0).model_matrix();
        // The secondary tumble is 22.5 degrees about X, which leaves X untouched.
        let p = m.transform_point3(Vec3::X);
        assert!((p - Vec3::new(0.0, 0.0, -4.0)).length() < 1e-5, "{p:?}");
    }
}
