use nenki_engine::coords::{CornerRadii, Rect, Vec2};
use nenki_engine::paint::Color;
use nenki_engine::scene::{Border, DrawList, TextCmd, ZIndex};

use crate::widgets::text::TextStyle;

/// Drawing surface handed out by [`LayoutCx::painter`](crate::context::LayoutCx::painter).
///
/// Coordinates are in the calling widget's local space.
pub struct Painter<'a> {
    scene: &'a mut DrawList,
    z: ZIndex,
}

impl<'a> Painter<'a> {
    pub(crate) fn new(scene: &'a mut DrawList, z: ZIndex) -> Self {
        Self { scene, z }
    }

    /// Layer subsequent commands paint on.
    #[inline]
    pub fn z(&self) -> ZIndex {
        self.z
    }

    // ── shapes ────────────────────────────────────────────────────────────

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        if rect.is_empty() || color.a <= 0.0 {
            return;
        }
        self.scene.push_rect(self.z, rect, color);
    }

    /// Filled rounded rectangle with an optional stroke. Radii larger than
    /// half the rect are shrunk to fit.
    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, fill: Color, border: Option<Border>) {
        if rect.is_empty() {
            return;
        }
        self.scene.push_rounded_rect(self.z, rect, CornerRadii::all(radius.max(0.0)), fill, border);
    }

    /// Stroke-only rounded rectangle.
    pub fn stroke_rounded_rect(&mut self, rect: Rect, radius: f32, width: f32, color: Color) {
        if width <= 0.0 {
            return;
        }
        self.fill_rounded_rect(rect, radius, Color::TRANSPARENT, Some(Border::new(width, color)));
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, fill: Color, border: Option<Border>) {
        if radius <= 0.0 {
            return;
        }
        self.scene.push_circle(self.z, center, radius, fill, border);
    }

    // ── text ──────────────────────────────────────────────────────────────

    /// Draws `text` with its top-left corner at `origin`, wrapping at
    /// `max_width` if given.
    pub fn text(&mut self, text: &str, origin: Vec2, style: &TextStyle, max_width: Option<f32>) {
        if text.is_empty() {
            return;
        }
        self.scene.push_text(
            self.z,
            TextCmd {
                text: text.to_string(),
                size: style.size,
                color: style.color,
                origin,
                max_width: max_width.filter(|w| w.is_finite()),
                line_height: style.line_height(),
                weight: style.weight.value(),
            },
        );
    }

    // ── clipping ──────────────────────────────────────────────────────────

    /// Clips everything recorded until the matching [`pop_clip`](Self::pop_clip).
    pub fn push_clip(&mut self, rect: Rect) {
        self.scene.push_clip(rect);
    }

    pub fn pop_clip(&mut self) {
        self.scene.pop_clip();
    }
}
