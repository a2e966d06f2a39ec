use nenki_engine::coords::{Rect, Vec2};
use nenki_engine::paint::Color;
use nenki_engine::scene::{DrawCmd, RectCmd};

use crate::constraints::Edges;
use crate::context::LayoutCx;
use crate::widget::{ChildCapacity, Dimensions, Widget};

/// Wraps one child, optionally painting a flat background behind it.
///
/// The background covers the whole space offered when that space is
/// bounded, otherwise just the padded child.
#[derive(Debug, Default)]
pub struct ContainerLayout {
    background: Option<Color>,
    padding: Edges,
}

impl ContainerLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_background(&mut self, color: Color) -> &mut Self {
        self.background = Some(color);
        self
    }

    pub fn clear_background(&mut self) -> &mut Self {
        self.background = None;
        self
    }

    pub fn set_padding(&mut self, top: f32, left: f32, bottom: f32, right: f32) -> &mut Self {
        self.padding = Edges::new(top, left, bottom, right);
        self
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn padding(&self) -> Edges {
        self.padding
    }
}

impl Widget for ContainerLayout {
    fn layout(&mut self, cx: &mut LayoutCx<'_>) -> Dimensions {
        let Some(child) = cx.child() else {
            return Dimensions::ZERO;
        };
        let cs = cx.constraints;
        let mark = cx.mark();
        let d = cx.layout_child(child, cs.inset(self.padding));
        cx.translate_since(mark, self.padding.top_left());
        let size = cs.constrain(d.size + self.padding.size());

        if let Some(color) = self.background.filter(|c| c.a > 0.0) {
            let area = Vec2::new(
                if cs.max.x.is_finite() { cs.max.x } else { size.x },
                if cs.max.y.is_finite() { cs.max.y } else { size.y },
            );
            cx.insert_behind(mark, DrawCmd::Rect(RectCmd { rect: Rect::from_size(area), color }));
        }

        Dimensions { size, baseline: d.baseline + self.padding.bottom }
    }

    fn capacity(&self) -> ChildCapacity {
        ChildCapacity::One
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::Harness;
    use crate::widgets::testing::Block;

    fn first_rect(h: &Harness) -> Option<RectCmd> {
        h.scene.items().iter().find_map(|i| match &i.cmd {
            DrawCmd::Rect(r) => Some(r.clone()),
            _ => None,
        })
    }

    #[test]
    fn background_paints_beneath_child() {
        let mut h = Harness::new();
        let bg = Color::from_srgb_u8(0xee, 0xee, 0xee, 0xff);
        let c = h.tree.insert(ContainerLayout::new());
        let block = h.tree.insert(Block::new(Vec2::new(20.0, 10.0)));
        h.tree.get_mut(c).unwrap().append_child(block).set_background(bg);

        let d = h.layout(c, crate::constraints::Constraints::loose(Vec2::new(200.0, 100.0)));

        assert_eq!(d.size, Vec2::new(20.0, 10.0));
        let first = first_rect(&h).unwrap();
        assert_eq!(first.color, bg);
        assert_eq!(first.rect, Rect::new(0.0, 0.0, 200.0, 100.0));
    }

    #[test]
    fn padding_offsets_child() {
        let mut h = Harness::new();
        let c = h.tree.insert(ContainerLayout::new());
        let block = h.tree.insert(Block::new(Vec2::new(20.0, 10.0)));
        h.tree.get_mut(c).unwrap().append_child(block).set_padding(5.0, 3.0, 5.0, 3.0);

        let d = h.layout(c, crate::constraints::Constraints::loose(Vec2::new(200.0, 100.0)));

        assert_eq!(d.size, Vec2::new(26.0, 20.0));
        assert_eq!(Block::drawn_rects(&h.scene), vec![Rect::new(3.0, 5.0, 20.0, 10.0)]);
    }

    #[test]
    fn no_child_means_nothing() {
        let mut h = Harness::new();
        let c = h.tree.insert(ContainerLayout::new());
        h.tree.get_mut(c).unwrap().set_background(Color::BLACK);
        assert!(h.layout(c, Harness::window(50.0, 50.0)).is_zero());
        assert!(h.scene.items().is_empty());
    }

    #[test]
    fn destroyed_child_is_unlinked_on_next_layout() {
        let mut h = Harness::new();
        let c = h.tree.insert(ContainerLayout::new());
        let block = h.tree.insert(Block::new(Vec2::new(20.0, 10.0)));
        h.tree.get_mut(c).unwrap().append_child(block);
        h.tree.destroy(block);

        let d = h.layout(c, crate::constraints::Constraints::loose(Vec2::new(200.0, 100.0)));

        assert!(d.is_zero());
        assert_eq!(h.tree.child(c), None);
        assert!(!h.tree.contains(block));
    }
}
