//! Row and column containers.
//!
//! Both run the same pass along their main axis:
//!
//! 1. rigid children are laid out first, each offered what is left,
//! 2. the remaining main extent is split across flexed children by weight,
//!    with inner boundaries rounded cumulatively and the last one at the
//!    exact end, so the shares add up to the remaining extent,
//! 3. every child is then moved to its slot in insertion order. Spacing
//!    only separates children that take up room.

use nenki_engine::scene::Mark;

use crate::constraints::Axis;
use crate::context::LayoutCx;
use crate::tree::SizingPolicy;
use crate::widget::{ChildCapacity, Dimensions, Widget};

use super::anchor::layout_anchored;

// ── CrossAlign ────────────────────────────────────────────────────────────

/// Placement of a child across the container's axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CrossAlign {
    #[default]
    Start,
    Center,
    End,
}

impl CrossAlign {
    fn offset(self, space: f32, child: f32) -> f32 {
        let free = (space - child).max(0.0);
        match self {
            CrossAlign::Start => 0.0,
            CrossAlign::Center => (free / 2.0).round(),
            CrossAlign::End => free,
        }
    }
}

// ── distribution ──────────────────────────────────────────────────────────

/// Splits `space` proportionally to `weights`.
///
/// Share `i` spans from edge `i-1` to edge `i`. Inner edges sit at
/// `round(space * W(i) / W)` where `W(i)` is the running weight sum; the
/// last weighted edge is `space` itself, so a fractional remainder goes to
/// the last share and the shares add up to `space`. Non-positive weights
/// get nothing.
pub fn distribute(space: f32, weights: &[f32]) -> Vec<f32> {
    let total: f32 = weights.iter().map(|w| w.max(0.0)).sum();
    if total <= 0.0 || !space.is_finite() || space <= 0.0 {
        return vec![0.0; weights.len()];
    }
    let mut acc = 0.0;
    let mut prev = 0.0;
    weights
        .iter()
        .map(|w| {
            acc += w.max(0.0);
            let edge = if acc >= total { space } else { (space * acc / total).round().min(space) };
            let share = edge - prev;
            prev = edge;
            share
        })
        .collect()
}

// ── shared pass ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct FlexParams {
    axis: Axis,
    cross_align: CrossAlign,
    spacing: f32,
}

fn layout_flex(cx: &mut LayoutCx<'_>, p: FlexParams) -> Dimensions {
    let children = cx.children();
    if children.is_empty() {
        return Dimensions::ZERO;
    }
    let axis = p.axis;
    let cs = cx.constraints;
    let main_max = axis.main(cs.max);
    let cross_min = axis.cross(cs.min);
    let cross_max = axis.cross(cs.max);
    let shown = children.iter().filter(|c| cx.is_shown(c.id)).count();
    let gaps = p.spacing * shown.saturating_sub(1) as f32;

    let mut dims = vec![Dimensions::ZERO; children.len()];
    let mut spans: Vec<Option<(Mark, Mark)>> = vec![None; children.len()];
    let mut used = gaps;

    for (i, child) in children.iter().enumerate() {
        if child.policy != SizingPolicy::Rigid {
            continue;
        }
        let left = (main_max - used).max(0.0);
        let start = cx.mark();
        dims[i] = cx.layout_child(child.id, axis.constraints(0.0, left, cross_min, cross_max));
        spans[i] = Some((start, cx.mark()));
        used += axis.main(dims[i].size);
    }

    let flexed: Vec<usize> = (0..children.len()).filter(|&i| children[i].policy.weight().is_some()).collect();
    let weights: Vec<f32> = flexed.iter().filter_map(|&i| children[i].policy.weight()).collect();
    let remaining = (main_max - used).max(0.0);
    let shares = distribute(remaining, &weights);

    for (&i, &share) in flexed.iter().zip(&shares) {
        let child = children[i];
        let start = cx.mark();
        dims[i] = if !remaining.is_finite() {
            // Nothing to split along an unbounded axis: natural size.
            cx.layout_child(child.id, axis.constraints(0.0, f32::INFINITY, cross_min, cross_max))
        } else if let SizingPolicy::FlexAnchored(_, dir) = child.policy {
            let cross_box = if cross_max.is_finite() { cross_max } else { cross_min };
            layout_anchored(cx, child.id, axis.constraints(share, share, cross_box, cross_max), dir)
        } else {
            cx.layout_child(child.id, axis.constraints(share, share, cross_min, cross_max))
        };
        spans[i] = Some((start, cx.mark()));
    }

    let cross = dims.iter().map(|d| axis.cross(d.size)).fold(cross_min, f32::max).min(cross_max);
    let mut main = 0.0;
    let mut placed_any = false;
    for (i, d) in dims.iter().enumerate() {
        let takes_room = !d.is_zero();
        if takes_room && placed_any {
            main += p.spacing;
        }
        if let Some((start, end)) = spans[i] {
            let at = axis.pack(main, p.cross_align.offset(cross, axis.cross(d.size)));
            cx.translate_range(start, end, at);
        }
        if takes_room {
            main += axis.main(d.size);
            placed_any = true;
        }
    }

    let size = cs.constrain(axis.pack(main, cross));
    let baseline = match axis {
        // Row baseline follows its first child.
        Axis::Horizontal => {
            let d = dims[0];
            let top = p.cross_align.offset(cross, d.size.y);
            (size.y - top - d.size.y + d.baseline).max(0.0)
        }
        Axis::Vertical => dims.last().map(|d| d.baseline).unwrap_or(0.0),
    };
    Dimensions { size, baseline }
}

// ── RowLayout / ColumnLayout ──────────────────────────────────────────────

macro_rules! flex_container {
    ($(#[$doc:meta])* $name:ident, $axis:expr) => {
        $(#[$doc])*
        #[derive(Debug)]
        pub struct $name {
            params: FlexParams,
        }

        impl Default for $name {
            fn default() -> Self {
                Self { params: FlexParams { axis: $axis, ..FlexParams::default() } }
            }
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn set_cross_align(&mut self, align: CrossAlign) -> &mut Self {
                self.params.cross_align = align;
                self
            }

            /// Gap between consecutive children.
            pub fn set_spacing(&mut self, spacing: f32) -> &mut Self {
                self.params.spacing = spacing.max(0.0);
                self
            }

            pub fn cross_align(&self) -> CrossAlign {
                self.params.cross_align
            }

            pub fn spacing(&self) -> f32 {
                self.params.spacing
            }
        }

        impl Widget for $name {
            fn layout(&mut self, cx: &mut LayoutCx<'_>) -> Dimensions {
                layout_flex(cx, self.params)
            }

            fn capacity(&self) -> ChildCapacity {
                ChildCapacity::Many
            }
        }
    };
}

flex_container!(
    /// Lays children out left to right.
    RowLayout,
    Axis::Horizontal
);

flex_container!(
    /// Lays children out top to bottom.
    ColumnLayout,
    Axis::Vertical
);

#[cfg(test)]
mod tests {
    use nenki_engine::coords::{Rect, Vec2};

    use super::*;
    use crate::constraints::Constraints;
    use crate::context::testing::Harness;
    use crate::widgets::anchor::Direction;
    use crate::widgets::testing::Block;

    // ── distribute ────────────────────────────────────────────────────────

    #[test]
    fn shares_sum_exactly() {
        let shares = distribute(100.0, &[1.0, 1.0, 1.0]);
        assert_eq!(shares, vec![33.0, 34.0, 33.0]);
        assert_eq!(shares.iter().sum::<f32>(), 100.0);
    }

    #[test]
    fn shares_follow_weights() {
        assert_eq!(distribute(90.0, &[1.0, 2.0]), vec![30.0, 60.0]);
        assert_eq!(distribute(7.0, &[0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1]).iter().sum::<f32>(), 7.0);
    }

    #[test]
    fn fractional_space_goes_to_the_last_share() {
        assert_eq!(distribute(10.5, &[1.0]), vec![10.5]);
        let shares = distribute(69.5, &[1.0, 1.0]);
        assert_eq!(shares, vec![35.0, 34.5]);
        assert_eq!(shares.iter().sum::<f32>(), 69.5);
        assert_eq!(distribute(20.25, &[1.0, 0.0]), vec![20.25, 0.0]);
    }

    #[test]
    fn no_weight_no_share() {
        assert_eq!(distribute(50.0, &[0.0, 0.0]), vec![0.0, 0.0]);
        assert_eq!(distribute(f32::INFINITY, &[1.0]), vec![0.0]);
    }

    // ── column ────────────────────────────────────────────────────────────

    #[test]
    fn rigid_then_flex_fill_the_column() {
        let mut h = Harness::new();
        let col = h.tree.insert(ColumnLayout::new());
        let a = h.tree.insert(Block::new(Vec2::new(10.0, 10.0)));
        let b = h.tree.insert(Block::new(Vec2::new(10.0, 20.0)));
        let c = h.tree.insert(Block::new(Vec2::new(10.0, 30.0)));
        let f = h.tree.insert(Block::new(Vec2::new(10.0, 0.0)));
        h.tree
            .get_mut(col)
            .unwrap()
            .append_rigid_child(a)
            .append_rigid_child(b)
            .append_rigid_child(c)
            .append_flex_child(1.0, f);

        let d = h.layout(col, Constraints::loose(Vec2::new(50.0, 100.0)));

        assert_eq!(d.size.y, 100.0);
        assert_eq!(
            Block::drawn_rects(&h.scene),
            vec![
                Rect::new(0.0, 0.0, 10.0, 10.0),
                Rect::new(0.0, 10.0, 10.0, 20.0),
                Rect::new(0.0, 30.0, 10.0, 30.0),
                Rect::new(0.0, 60.0, 10.0, 40.0),
            ]
        );
    }

    #[test]
    fn flex_between_rigid_keeps_insertion_order() {
        let mut h = Harness::new();
        let row = h.tree.insert(RowLayout::new());
        let a = h.tree.insert(Block::new(Vec2::new(10.0, 5.0)));
        let f = h.tree.insert(Block::new(Vec2::new(0.0, 5.0)));
        let b = h.tree.insert(Block::new(Vec2::new(20.0, 5.0)));
        h.tree.get_mut(row).unwrap().append_rigid_child(a).append_flex_child(1.0, f).append_rigid_child(b);

        h.layout(row, Constraints::loose(Vec2::new(100.0, 50.0)));

        assert_eq!(
            Block::drawn_rects(&h.scene),
            vec![Rect::new(0.0, 0.0, 10.0, 5.0), Rect::new(80.0, 0.0, 20.0, 5.0), Rect::new(10.0, 0.0, 70.0, 5.0)]
        );
    }

    #[test]
    fn flex_fills_fractional_remainder_without_overflow() {
        let mut h = Harness::new();
        let row = h.tree.insert(RowLayout::new());
        let a = h.tree.insert(Block::new(Vec2::new(30.4, 5.0)));
        let f = h.tree.insert(Block::new(Vec2::new(0.0, 5.0)));
        let g = h.tree.insert(Block::new(Vec2::new(0.0, 5.0)));
        h.tree.get_mut(row).unwrap().append_rigid_child(a).append_flex_child(1.0, f).append_flex_child(1.0, g);

        h.layout(row, Constraints::loose(Vec2::new(100.0, 50.0)));

        let rects = Block::drawn_rects(&h.scene);
        assert_eq!(rects.len(), 3);
        let flexed: f32 = rects[1].size.x + rects[2].size.x;
        assert!((flexed - (100.0 - 30.4)).abs() < 1e-4);
        assert!((rects[2].max().x - 100.0).abs() < 1e-4);
    }

    #[test]
    fn hidden_child_takes_no_spacing() {
        let mut h = Harness::new();
        let row = h.tree.insert(RowLayout::new());
        let ids: Vec<_> = (0..3).map(|_| h.tree.insert(Block::new(Vec2::new(10.0, 10.0)))).collect();
        {
            let mut r = h.tree.get_mut(row).unwrap();
            r.set_spacing(10.0);
            for id in &ids {
                r.append_rigid_child(*id);
            }
        }
        h.tree.set_update(ids[1], false);

        let d = h.layout(row, Constraints::loose(Vec2::new(100.0, 50.0)));

        assert_eq!(d.size.x, 30.0);
        assert_eq!(
            Block::drawn_rects(&h.scene),
            vec![Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(20.0, 0.0, 10.0, 10.0)]
        );
    }

    #[test]
    fn removing_a_child_closes_the_gap() {
        let mut h = Harness::new();
        let row = h.tree.insert(RowLayout::new());
        let ids: Vec<_> = (0..3).map(|_| h.tree.insert(Block::new(Vec2::new(10.0, 10.0)))).collect();
        {
            let mut r = h.tree.get_mut(row).unwrap();
            for id in &ids {
                r.append_rigid_child(*id);
            }
            r.remove_child_at(1);
        }

        h.layout(row, Constraints::loose(Vec2::new(100.0, 50.0)));

        assert_eq!(
            h.tree.children(row).iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![ids[0].id(), ids[2].id()]
        );
        assert_eq!(
            Block::drawn_rects(&h.scene),
            vec![Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(10.0, 0.0, 10.0, 10.0)]
        );
    }

    #[test]
    fn destroyed_child_gives_its_space_back() {
        let mut h = Harness::new();
        let row = h.tree.insert(RowLayout::new());
        let a = h.tree.insert(Block::new(Vec2::new(30.0, 10.0)));
        let f = h.tree.insert(Block::new(Vec2::new(0.0, 10.0)));
        h.tree.get_mut(row).unwrap().append_rigid_child(a).append_flex_child(1.0, f);
        h.tree.destroy(a);

        h.layout(row, Constraints::loose(Vec2::new(100.0, 50.0)));

        assert_eq!(Block::drawn_rects(&h.scene), vec![Rect::new(0.0, 0.0, 100.0, 10.0)]);
        assert_eq!(h.tree.child_count(row), 1);
    }

    #[test]
    fn anchored_flex_child_is_placed_in_its_share() {
        let mut h = Harness::new();
        let row = h.tree.insert(RowLayout::new());
        let a = h.tree.insert(Block::new(Vec2::new(10.0, 10.0)));
        h.tree.get_mut(row).unwrap().append_flex_anchor_child(1.0, Direction::BottomRight, a);

        let d = h.layout(row, Constraints::loose(Vec2::new(100.0, 40.0)));

        assert_eq!(d.size, Vec2::new(100.0, 40.0));
        assert_eq!(Block::drawn_rects(&h.scene), vec![Rect::new(90.0, 30.0, 10.0, 10.0)]);
    }

    #[test]
    fn spacing_and_center_alignment() {
        let mut h = Harness::new();
        let col = h.tree.insert(ColumnLayout::new());
        let a = h.tree.insert(Block::new(Vec2::new(40.0, 10.0)));
        let b = h.tree.insert(Block::new(Vec2::new(20.0, 10.0)));
        h.tree
            .get_mut(col)
            .unwrap()
            .then(|c| {
                c.set_spacing(5.0).set_cross_align(CrossAlign::Center);
            })
            .append_rigid_child(a)
            .append_rigid_child(b);

        let d = h.layout(col, Constraints::loose(Vec2::new(100.0, 100.0)));

        assert_eq!(d.size, Vec2::new(40.0, 25.0));
        assert_eq!(
            Block::drawn_rects(&h.scene),
            vec![Rect::new(0.0, 0.0, 40.0, 10.0), Rect::new(10.0, 15.0, 20.0, 10.0)]
        );
    }

    #[test]
    fn empty_container_is_zero() {
        let mut h = Harness::new();
        let row = h.tree.insert(RowLayout::new());
        assert!(h.layout(row, Harness::window(10.0, 10.0)).is_zero());
    }
}
