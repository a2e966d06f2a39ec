use super::Vec2;

/// Drawable area of a frame in dp, plus the dp → pixel factor.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Physical pixels per dp.
    pub scale: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32, scale: f32) -> Self {
        Self { width, height, scale }
    }

    #[inline]
    pub fn size(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width >= 0.0
            && self.height >= 0.0
            && self.width.is_finite()
            && self.height.is_finite()
            && self.scale > 0.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 0.0, height: 0.0, scale: 1.0 }
    }
}
