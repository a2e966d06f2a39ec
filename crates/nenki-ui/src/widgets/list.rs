//! Virtualized scrolling list.
//!
//! Only children overlapping the viewport are laid out each frame. The
//! scroll state is a [`Position`]: the first visible child and how far it
//! is scrolled past. Everything else is derived from it per frame.
//!
//! A child is laid out at most once per frame. Its output is held back
//! until the visible run is known, then spliced in index order.

use std::collections::BTreeMap;

use nenki_engine::coords::{Rect, Vec2};

use crate::constraints::{Axis, Constraints};
use crate::context::{Detached, LayoutCx};
use crate::event::UiEvent;
use crate::tree::WidgetId;
use crate::widget::{ChildCapacity, Dimensions, Widget};

use super::scrollbar::{AnchorStrategy, Scrollbar, ScrollbarStyle, from_list_position};

/// Hit part of the list's wheel area.
const PART_VIEWPORT: u32 = 0;

/// Scroll state of a [`ListLayout`] after its last layout.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    /// Index of the first visible child.
    pub first: usize,
    /// How far the first child is scrolled out of view.
    pub offset: f32,
    /// Viewport end minus the end of the last visible child; negative when
    /// that child overflows.
    pub offset_last: f32,
    /// Number of children laid out.
    pub count: usize,
    /// Estimated extent of all children.
    pub length: f32,
    /// `false` once the last child is fully in view.
    pub before_end: bool,
}

/// Pending scroll requests, applied at the next layout.
#[derive(Debug, Default)]
struct Scroll {
    /// In items; the fraction scrolls by the average item extent.
    items: f32,
    pixels: f32,
    to_item: Option<usize>,
}

struct Placed {
    dims: Dimensions,
    at: f32,
}

/// Children laid out so far this frame, by index.
struct Pass<'i> {
    ids: &'i [WidgetId],
    cs: Constraints,
    axis: Axis,
    laid: BTreeMap<usize, Detached>,
}

impl Pass<'_> {
    /// Main extent of child `i`, laying it out on first use.
    fn extent(&mut self, cx: &mut LayoutCx<'_>, i: usize) -> f32 {
        let (ids, cs) = (self.ids, self.cs);
        let d = self.laid.entry(i).or_insert_with(|| cx.layout_child_detached(ids[i], cs));
        self.axis.main(d.dims.size)
    }

    /// Moves `first`/`offset` back while `offset` is negative.
    fn settle_backwards(&mut self, cx: &mut LayoutCx<'_>, first: &mut usize, offset: &mut f32) {
        while *offset < 0.0 && *first > 0 {
            *first -= 1;
            *offset += self.extent(cx, *first);
        }
        if *offset < 0.0 {
            *offset = 0.0;
        }
    }

    /// Walks forward from `first` until `viewport` is filled. Children
    /// entirely before the viewport are folded into `offset`. Returns the
    /// end of the visible run and where its last child ends.
    fn forward(&mut self, cx: &mut LayoutCx<'_>, viewport: f32, first: &mut usize, offset: &mut f32) -> (usize, f32) {
        let n = self.ids.len();
        while *first + 1 < n {
            let ext = self.extent(cx, *first);
            if ext > *offset {
                break;
            }
            *offset -= ext;
            *first += 1;
        }
        let mut at = -*offset;
        let mut i = *first;
        while i < n && at < viewport {
            at += self.extent(cx, i);
            i += 1;
        }
        (i, at)
    }
}

/// Scrolls its children along one axis, with a scrollbar.
#[derive(Debug, Default)]
pub struct ListLayout {
    axis: Axis,
    position: Position,
    scroll: Scroll,
    scroll_to_end: bool,
    style: ScrollbarStyle,
    bar: Scrollbar,
}

impl ListLayout {
    pub fn new(axis: Axis) -> Self {
        Self { axis, ..Self::default() }
    }

    pub fn set_axis(&mut self, axis: Axis) -> &mut Self {
        self.axis = axis;
        self
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Keeps the list pinned to its end while it is at the end, so
    /// appended children scroll into view.
    pub fn set_scroll_to_end(&mut self, enabled: bool) -> &mut Self {
        self.scroll_to_end = enabled;
        self
    }

    pub fn scroll_to_end(&self) -> bool {
        self.scroll_to_end
    }

    /// Scrolls by `items` children (fractions allowed, negative goes back).
    pub fn scroll_by(&mut self, items: f32) -> &mut Self {
        self.scroll.items += items;
        self
    }

    /// Makes child `index` the first visible one.
    pub fn scroll_to_item(&mut self, index: usize) -> &mut Self {
        self.scroll = Scroll { to_item: Some(index), ..Scroll::default() };
        self
    }

    /// Scroll state after the last layout.
    pub fn position(&self) -> Position {
        self.position
    }

    // ── scrollbar style ───────────────────────────────────────────────────

    pub fn with_scrollbar_style(mut self, style: ScrollbarStyle) -> Self {
        self.style = style;
        self
    }

    pub fn scrollbar_style(&self) -> &ScrollbarStyle {
        &self.style
    }

    pub fn set_scroll_track_color(&mut self, color: nenki_engine::paint::Color) -> &mut Self {
        self.style.track_color = color;
        self
    }

    /// Track padding across (`minor`) and along (`major`) the bar.
    pub fn set_scroll_padding(&mut self, minor: f32, major: f32) -> &mut Self {
        self.style.minor_padding = minor.max(0.0);
        self.style.major_padding = major.max(0.0);
        self
    }

    pub fn set_scroll_width(&mut self, width: f32) -> &mut Self {
        self.style.width = width.max(0.0);
        self
    }

    pub fn set_scroll_min_length(&mut self, len: f32) -> &mut Self {
        self.style.min_length = len.max(0.0);
        self
    }

    pub fn set_scroll_corner_radius(&mut self, radius: f32) -> &mut Self {
        self.style.corner_radius = radius.max(0.0);
        self
    }

    pub fn set_scroll_color(&mut self, color: nenki_engine::paint::Color) -> &mut Self {
        self.style.color = color;
        self
    }

    pub fn set_scroll_hover_color(&mut self, color: nenki_engine::paint::Color) -> &mut Self {
        self.style.hover_color = color;
        self
    }

    /// `true` reserves room for the bar, `false` floats it over the items.
    pub fn set_scroll_padding_enabled(&mut self, enabled: bool) -> &mut Self {
        self.style.anchor = if enabled { AnchorStrategy::Occupy } else { AnchorStrategy::Overlay };
        self
    }

    // ── layout helpers ────────────────────────────────────────────────────

    fn child_constraints(&self, cross_min: f32, cross_max: f32) -> Constraints {
        self.axis.constraints(0.0, f32::INFINITY, cross_min, cross_max)
    }

    /// Applies pending requests and wheel input to the stored position.
    fn take_scroll(&mut self, n: usize) -> (usize, f32) {
        let scroll = std::mem::take(&mut self.scroll);
        let mut first = self.position.first;
        let mut offset = self.position.offset;

        if let Some(i) = scroll.to_item {
            first = i;
            offset = 0.0;
        }
        if scroll.items != 0.0 {
            let whole = scroll.items.trunc();
            let avg = if n > 0 { self.position.length / n as f32 } else { 0.0 };
            if whole >= 0.0 {
                first = first.saturating_add(whole as usize);
            } else {
                first = first.saturating_sub((-whole) as usize);
            }
            offset += (scroll.items.fract() * avg).round();
        }
        offset += scroll.pixels;

        let at_end = self.scroll_to_end && !self.position.before_end && scroll.to_item.is_none()
            && scroll.items == 0.0 && scroll.pixels == 0.0;
        if at_end || first >= n {
            // Lay out from past the end and let underflow pull it back.
            first = n;
            offset = 0.0;
        }
        (first, offset)
    }
}

impl Widget for ListLayout {
    fn layout(&mut self, cx: &mut LayoutCx<'_>) -> Dimensions {
        let axis = self.axis;
        let ids: Vec<WidgetId> = cx.children().iter().map(|c| c.id).collect();
        let n = ids.len();
        let events = cx.events();

        // Bar input is measured against last frame's geometry.
        let bar_delta = self.bar.handle(&events, axis);
        if bar_delta != 0.0 {
            self.scroll.items += bar_delta * n as f32;
        }
        for ev in &events {
            if let UiEvent::Scroll { delta, .. } = ev {
                let main = match axis {
                    Axis::Horizontal if delta.x == 0.0 => delta.y,
                    _ => axis.main(*delta),
                };
                self.scroll.pixels += main;
            }
        }

        if n == 0 {
            self.position = Position::default();
            return Dimensions::ZERO;
        }

        let cs = cx.constraints;
        let bar_width = self.style.thickness();
        let occupy = self.style.anchor == AnchorStrategy::Occupy;
        let reserve = if occupy { bar_width } else { 0.0 };
        let cross_max = (axis.cross(cs.max) - reserve).max(0.0);
        let cross_min = (axis.cross(cs.min) - reserve).max(0.0).min(cross_max);
        let viewport = axis.main(cs.max);
        let child_cs = self.child_constraints(cross_min, cross_max);

        let (mut first, mut offset) = self.take_scroll(n);
        let list_mark = cx.mark();

        let mut clip = Rect::from_size(axis.pack(viewport, cross_max));
        if !viewport.is_finite() || !cross_max.is_finite() {
            clip = Rect::from_size(Vec2::new(f32::MAX, f32::MAX));
        }
        cx.painter().push_clip(clip);

        let mut pass = Pass { ids: &ids, cs: child_cs, axis, laid: BTreeMap::new() };
        pass.settle_backwards(cx, &mut first, &mut offset);
        let (mut last, mut content_end) = pass.forward(cx, viewport, &mut first, &mut offset);

        // Scrolled past the end: pull back so the last child ends flush.
        if last == n && viewport.is_finite() && content_end < viewport && (first > 0 || offset > 0.0) {
            offset -= viewport - content_end;
            pass.settle_backwards(cx, &mut first, &mut offset);
            (last, content_end) = pass.forward(cx, viewport, &mut first, &mut offset);
        }

        // Commit the visible run; whatever else was laid out is dropped.
        let mut placed = Vec::with_capacity(last - first);
        let mut at = -offset;
        for i in first..last {
            let Some(d) = pass.laid.remove(&i) else { continue };
            let ext = axis.main(d.dims.size);
            placed.push(Placed { dims: d.dims, at });
            cx.splice(d, axis.pack(at, 0.0));
            at += ext;
        }

        let cross = placed
            .iter()
            .map(|p| axis.cross(p.dims.size))
            .fold(cross_min, f32::max)
            .min(cross_max);
        cx.painter().pop_clip();

        let end = if placed.is_empty() { 0.0 } else { content_end };
        let sum: f32 = placed.iter().map(|p| axis.main(p.dims.size)).sum();
        let count = placed.len();
        let length = if count > 0 { sum / count as f32 * n as f32 } else { 0.0 };
        let main_size = if viewport.is_finite() { end.min(viewport).max(0.0) } else { end };
        let main_size = main_size.max(axis.main(cs.min)).min(viewport);
        let size_inner = axis.pack(main_size, cross);

        self.position = Position {
            first,
            offset,
            offset_last: main_size - end,
            count,
            length,
            before_end: first + count < n || end > main_size,
        };

        let window = from_list_position(&self.position, n, main_size);
        let bar = Rect::from_origin_size(
            axis.pack(0.0, if occupy { cross } else { (cross - bar_width).max(0.0) }),
            axis.pack(main_size, bar_width),
        );
        let style = self.style;
        self.bar.paint(cx, &style, axis, bar, window);

        cx.register_scroll_hit_behind(list_mark, Rect::from_size(size_inner), PART_VIEWPORT);

        let size = cs.constrain(size_inner + if occupy { axis.pack(0.0, bar_width) } else { Vec2::ZERO });
        Dimensions::new(size)
    }

    fn capacity(&self) -> ChildCapacity {
        ChildCapacity::Many
    }
}
