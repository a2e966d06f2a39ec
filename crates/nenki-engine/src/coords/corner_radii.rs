/// Per-corner radii for a rounded rectangle.
///
/// Corner order is top-left, top-right, bottom-right, bottom-left.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct CornerRadii {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_right: f32,
    pub bottom_left: f32,
}

impl CornerRadii {
    #[inline]
    pub const fn new(top_left: f32, top_right: f32, bottom_right: f32, bottom_left: f32) -> Self {
        Self { top_left, top_right, bottom_right, bottom_left }
    }

    /// Uniform radius on all four corners.
    #[inline]
    pub const fn all(r: f32) -> Self {
        Self { top_left: r, top_right: r, bottom_right: r, bottom_left: r }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self::all(0.0)
    }

    /// Limits every radius to half of the shorter side of `size`.
    #[must_use]
    pub fn fit(self, width: f32, height: f32) -> Self {
        let cap = (width.min(height) * 0.5).max(0.0);
        Self {
            top_left: self.top_left.clamp(0.0, cap),
            top_right: self.top_right.clamp(0.0, cap),
            bottom_right: self.bottom_right.clamp(0.0, cap),
            bottom_left: self.bottom_left.clamp(0.0, cap),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_caps_to_half_short_side() {
        let r = CornerRadii::all(40.0).fit(100.0, 20.0);
        assert_eq!(r, CornerRadii::all(10.0));
    }

    #[test]
    fn fit_clamps_negative_to_zero() {
        let r = CornerRadii::new(-1.0, 2.0, 3.0, 4.0).fit(100.0, 100.0);
        assert_eq!(r.top_left, 0.0);
        assert_eq!(r.bottom_left, 4.0);
    }
}
