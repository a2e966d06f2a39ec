use nenki_engine::coords::Vec2;

use crate::constraints::Constraints;
use crate::context::LayoutCx;
use crate::tree::WidgetId;
use crate::widget::{ChildCapacity, Dimensions, Widget};

/// Where a child sits inside a larger box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    #[default]
    Center,
}

impl Direction {
    /// Top-left offset of a `child` sized box anchored inside `space`.
    pub fn position(self, child: Vec2, space: Vec2) -> Vec2 {
        let free = Vec2::new((space.x - child.x).max(0.0), (space.y - child.y).max(0.0));
        let (fx, fy) = match self {
            Direction::TopLeft => (0.0, 0.0),
            Direction::Top => (0.5, 0.0),
            Direction::TopRight => (1.0, 0.0),
            Direction::Right => (1.0, 0.5),
            Direction::BottomRight => (1.0, 1.0),
            Direction::Bottom => (0.5, 1.0),
            Direction::BottomLeft => (0.0, 1.0),
            Direction::Left => (0.0, 0.5),
            Direction::Center => (0.5, 0.5),
        };
        Vec2::new((free.x * fx).round(), (free.y * fy).round())
    }
}

/// Lays `child` out loosely inside `cs` and moves it to `dir`.
///
/// The result fills `cs.min`, so a tight box stays fully occupied while
/// the child keeps its natural size inside it.
pub(crate) fn layout_anchored(cx: &mut LayoutCx<'_>, child: WidgetId, cs: Constraints, dir: Direction) -> Dimensions {
    let mark = cx.mark();
    let d = cx.layout_child(child, cs.loosen());
    let size = d.size.max(cs.min);
    let offset = dir.position(d.size, size);
    cx.translate_since(mark, offset);
    Dimensions { size, baseline: d.baseline + (size.y - d.size.y - offset.y) }
}

/// Positions its only child at one of nine anchor points.
#[derive(Debug, Default)]
pub struct AnchorLayout {
    direction: Direction,
}

impl AnchorLayout {
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }

    pub fn set_direction(&mut self, direction: Direction) -> &mut Self {
        self.direction = direction;
        self
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl Widget for AnchorLayout {
    fn layout(&mut self, cx: &mut LayoutCx<'_>) -> Dimensions {
        let Some(child) = cx.child() else {
            return Dimensions::ZERO;
        };
        // Anchoring needs a box to anchor in; unbounded axes shrink to the child.
        let cs = cx.constraints;
        let space = Constraints {
            min: Vec2::new(
                if cs.max.x.is_finite() { cs.max.x } else { cs.min.x },
                if cs.max.y.is_finite() { cs.max.y } else { cs.min.y },
            ),
            max: cs.max,
        };
        layout_anchored(cx, child, space, self.direction)
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

    #[test]
    fn corners_and_center() {
        let space = Vec2::new(100.0, 50.0);
        let child = Vec2::new(20.0, 10.0);
        assert_eq!(Direction::TopLeft.position(child, space), Vec2::new(0.0, 0.0));
        assert_eq!(Direction::BottomRight.position(child, space), Vec2::new(80.0, 40.0));
        assert_eq!(Direction::Center.position(child, space), Vec2::new(40.0, 20.0));
        assert_eq!(Direction::Left.position(child, space), Vec2::new(0.0, 20.0));
    }

    #[test]
    fn oversized_child_is_not_pushed_negative() {
        let p = Direction::BottomRight.position(Vec2::new(200.0, 10.0), Vec2::new(100.0, 50.0));
        assert_eq!(p, Vec2::new(0.0, 40.0));
    }

    #[test]
    fn anchor_fills_window_and_moves_child() {
        let mut h = Harness::new();
        let anchor = h.tree.insert(AnchorLayout::new(Direction::BottomRight));
        let block = h.tree.insert(Block::new(Vec2::new(10.0, 10.0)));
        h.tree.get_mut(anchor).unwrap().append_child(block);

        let d = h.layout(anchor, Harness::window(100.0, 60.0));

        assert_eq!(d.size, Vec2::new(100.0, 60.0));
        assert_eq!(Block::drawn_rects(&h.scene), vec![nenki_engine::coords::Rect::new(90.0, 50.0, 10.0, 10.0)]);
    }

    #[test]
    fn empty_anchor_is_zero() {
        let mut h = Harness::new();
        let anchor = h.tree.insert(AnchorLayout::default());
        assert!(h.layout(anchor, Harness::window(100.0, 60.0)).is_zero());
    }
}
