/// Raster region of a surface, in physical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Viewport covering the whole surface.
    #[inline]
    pub const fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Width over height. Only meaningful for a valid viewport.
    #[inline]
    pub fn aspect_ratio(self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_viewport_starts_at_origin() {
        let vp = Viewport::full(1280, 720);
        assert_eq!((vp.x, vp.y), (0, 0));
        assert_eq!((vp.width, vp.height), (1280, 720));
    }

    #[test]
    fn aspect_ratio_is_width_over_height() {
        assert_eq!(Viewport::full(800, 400).aspect_ratio(), 2.0);
        assert_eq!(Viewport::full(480, 800).aspect_ratio(), 0.6);
    }

    #[test]
    fn zero_sized_viewport_is_invalid() {
        assert!(!Viewport::full(0, 720).is_valid());
        assert!(!Viewport::full(1280, 0).is_valid());
        assert!(Viewport::full(1, 1).is_valid());
    }
}
