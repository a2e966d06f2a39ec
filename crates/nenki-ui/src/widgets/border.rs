use nenki_engine::coords::Rect;
use nenki_engine::paint::Color;

use crate::constraints::Edges;
use crate::context::LayoutCx;
use crate::widget::{ChildCapacity, Dimensions, Widget};

/// Strokes an outline around its only child.
///
/// The child sits inside `padding` plus the stroke width, so the stroke
/// never overlaps it.
#[derive(Debug)]
pub struct Border {
    color: Color,
    width: f32,
    corner_radius: f32,
    padding: Edges,
}

impl Default for Border {
    fn default() -> Self {
        Self { color: Color::BLACK, width: 1.0, corner_radius: 0.0, padding: Edges::default() }
    }
}

impl Border {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_color(&mut self, color: Color) -> &mut Self { self.color = color; self }
    pub fn set_width(&mut self, width: f32) -> &mut Self { self.width = width.max(0.0); self }
    pub fn set_corner_radius(&mut self, radius: f32) -> &mut Self { self.corner_radius = radius.max(0.0); self }
    pub fn set_padding(&mut self, top: f32, left: f32, bottom: f32, right: f32) -> &mut Self {
        self.padding = Edges::new(top, left, bottom, right);
        self
    }

    pub fn color(&self) -> Color { self.color }
    pub fn width(&self) -> f32 { self.width }
    pub fn corner_radius(&self) -> f32 { self.corner_radius }
    pub fn padding(&self) -> Edges { self.padding }
}

impl Widget for Border {
    fn layout(&mut self, cx: &mut LayoutCx<'_>) -> Dimensions {
        let Some(child) = cx.child() else {
            return Dimensions::ZERO;
        };
        let inset = self.padding + Edges::all(self.width);
        let cs = cx.constraints;
        let mark = cx.mark();
        let d = cx.layout_child(child, cs.inset(inset));
        cx.translate_since(mark, inset.top_left());
        let size = cs.constrain(d.size + inset.size());

        // Centre the stroke on a rect inset by half its width.
        let half = self.width / 2.0;
        let outline = Rect::new(half, half, (size.x - self.width).max(0.0), (size.y - self.width).max(0.0));
        cx.painter().stroke_rounded_rect(outline, self.corner_radius, self.width, self.color);

        Dimensions { size, baseline: d.baseline + inset.bottom }
    }

    fn capacity(&self) -> ChildCapacity {
        ChildCapacity::One
    }
}

#[cfg(test)]
mod tests {
    use nenki_engine::coords::Vec2;
    use nenki_engine::scene::DrawCmd;

    use super::*;
    use crate::constraints::Constraints;
    use crate::context::testing::Harness;
    use crate::widgets::testing::Block;

    #[test]
    fn child_sits_inside_padding_and_stroke() {
        let mut h = Harness::new();
        let b = h.tree.insert(Border::new());
        let block = h.tree.insert(Block::new(Vec2::new(20.0, 10.0)));
        h.tree
            .get_mut(b)
            .unwrap()
            .then(|b| {
                b.set_width(2.0).set_padding(4.0, 4.0, 4.0, 4.0);
            })
            .append_child(block);

        let d = h.layout(b, Constraints::loose(Vec2::new(200.0, 100.0)));

        assert_eq!(d.size, Vec2::new(32.0, 22.0));
        assert_eq!(Block::drawn_rects(&h.scene), vec![Rect::new(6.0, 6.0, 20.0, 10.0)]);
    }

    #[test]
    fn stroke_is_drawn_after_child() {
        let mut h = Harness::new();
        let b = h.tree.insert(Border::new());
        let block = h.tree.insert(Block::new(Vec2::new(20.0, 10.0)));
        h.tree.get_mut(b).unwrap().append_child(block);
        h.layout(b, Constraints::loose(Vec2::new(200.0, 100.0)));

        let last = h.scene.items().last().map(|i| &i.cmd);
        assert!(matches!(last, Some(DrawCmd::RoundedRect(r)) if r.border.is_some()));
    }

    #[test]
    fn empty_border_is_zero() {
        let mut h = Harness::new();
        let b = h.tree.insert(Border::new());
        assert!(h.layout(b, Harness::window(50.0, 50.0)).is_zero());
    }
}
