use crate::coords::{CornerRadii, Rect};
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList, ZIndex};

use super::Border;

/// Rounded rectangle draw payload. A transparent `fill` with a border is a
/// pure outline.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundedRectCmd {
    pub rect: Rect,
    pub radii: CornerRadii,
    pub fill: Color,
    pub border: Option<Border>,
}

impl DrawList {
    /// Records a rounded rectangle.
    #[inline]
    pub fn push_rounded_rect(
        &mut self,
        z: ZIndex,
        rect: Rect,
        radii: CornerRadii,
        fill: Color,
        border: Option<Border>,
    ) {
        let radii = radii.fit(rect.size.x, rect.size.y);
        self.push(z, DrawCmd::RoundedRect(RoundedRectCmd { rect, radii, fill, border }));
    }
}
