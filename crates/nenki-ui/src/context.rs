//! Per-widget layout context and the layout driver.

use std::time::{Duration, Instant};

use nenki_engine::coords::{Rect, Vec2};
use nenki_engine::scene::{DrawCmd, DrawList, Mark, Recording, ZIndex};
use nenki_engine::text::TextMetrics;
use nenki_engine::time::FrameTime;

use crate::constraints::Constraints;
use crate::event::UiEvent;
use crate::painter::Painter;
use crate::router::InputRouter;
use crate::tree::{Child, WidgetId, WidgetTree};
use crate::widget::Dimensions;
use crate::widgets::text::TextStyle;

/// Frame-wide values every widget sees.
#[derive(Clone, Copy)]
pub struct FrameInfo<'a> {
    pub time: FrameTime,
    /// Physical pixels per dp.
    pub scale: f32,
    pub metrics: &'a dyn TextMetrics,
    /// Default click/long-click gap for buttons without their own.
    pub long_click_threshold: Duration,
}

/// A child's layout output held outside the draw stream.
///
/// Produced by [`LayoutCx::layout_child_detached`]. Splice it back with
/// [`LayoutCx::splice`] or drop it to discard what the child recorded.
pub struct Detached {
    pub dims: Dimensions,
    scene: Recording,
    focus: Vec<WidgetId>,
}

/// What a widget gets while it lays itself out.
///
/// `constraints` already excludes the widget's margin. Drawing and hit
/// areas are recorded in local space; the parent moves them into place.
pub struct LayoutCx<'a> {
    pub constraints: Constraints,
    id: WidgetId,
    frame: FrameInfo<'a>,
    tree: &'a mut WidgetTree,
    scene: &'a mut DrawList,
    input: Option<&'a mut InputRouter>,
    redraw_at: &'a mut Option<Instant>,
}

impl<'a> LayoutCx<'a> {
    pub(crate) fn new(
        frame: FrameInfo<'a>,
        tree: &'a mut WidgetTree,
        scene: &'a mut DrawList,
        input: Option<&'a mut InputRouter>,
        redraw_at: &'a mut Option<Instant>,
        id: WidgetId,
        constraints: Constraints,
    ) -> Self {
        Self { constraints, id, frame, tree, scene, input, redraw_at }
    }

    /// Lays out the node this context was built for, margins included.
    ///
    /// Destroyed, hidden and missing nodes produce zero dimensions and
    /// record nothing.
    pub(crate) fn run(&mut self) -> Dimensions {
        let id = self.id;
        let Some(node) = self.tree.topology().node(id) else {
            return Dimensions::ZERO;
        };
        if node.destroyed || !node.update {
            return Dimensions::ZERO;
        }
        let margin = node.margin;
        self.tree.prune(id);

        // Out of its slot while it runs; a re-entrant visit sees nothing.
        let Some(mut widget) = self.tree.take_widget(id) else {
            log::warn!("widget {id:?} reached twice in one layout pass");
            return Dimensions::ZERO;
        };

        let outer = self.constraints;
        self.constraints = outer.inset(margin);
        let mark = self.scene.mark();
        let dims = widget.layout(self);
        self.tree.restore_widget(id, widget);
        self.constraints = outer;
        self.scene.translate_since(mark, margin.top_left());

        Dimensions {
            size: outer.constrain(dims.size + margin.size()),
            baseline: dims.baseline + margin.bottom,
        }
    }

    // ── identity and frame ────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> WidgetId {
        self.id
    }

    #[inline]
    pub fn now(&self) -> Instant {
        self.frame.time.now
    }

    /// Seconds since the previous frame.
    #[inline]
    pub fn dt(&self) -> f32 {
        self.frame.time.dt
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.frame.scale
    }

    #[inline]
    pub fn long_click_threshold(&self) -> Duration {
        self.frame.long_click_threshold
    }

    /// Converts dp to physical pixels.
    #[inline]
    pub fn px(&self, dp: f32) -> f32 {
        dp * self.frame.scale
    }

    // ── children ──────────────────────────────────────────────────────────

    /// Snapshot of this widget's live children in order.
    pub fn children(&self) -> Vec<Child> {
        self.tree.children(self.id).to_vec()
    }

    pub fn child(&self) -> Option<WidgetId> {
        self.tree.child(self.id)
    }

    pub fn child_count(&self) -> usize {
        self.tree.child_count(self.id)
    }

    /// `false` for hidden or destroyed children, which lay out to zero.
    pub fn is_shown(&self, child: WidgetId) -> bool {
        self.tree.is_update(child)
    }

    /// Lays out `child` at this widget's origin. Move it afterwards with
    /// [`translate_since`](Self::translate_since).
    pub fn layout_child(&mut self, child: WidgetId, constraints: Constraints) -> Dimensions {
        let mut cx = LayoutCx {
            constraints,
            id: child,
            frame: self.frame,
            tree: &mut *self.tree,
            scene: &mut *self.scene,
            input: self.input.as_deref_mut(),
            redraw_at: &mut *self.redraw_at,
        };
        cx.run()
    }

    /// Lays out `child` without committing its output, so a container can
    /// decide its order or visibility once siblings are known. Tab order
    /// follows the splice order.
    pub fn layout_child_detached(&mut self, child: WidgetId, constraints: Constraints) -> Detached {
        let mark = self.scene.mark();
        let focus_mark = self.input.as_deref().map_or(0, |r| r.focus_mark());
        let dims = self.layout_child(child, constraints);
        let scene = self.scene.detach(mark);
        let focus = self.input.as_deref_mut().map(|r| r.detach_focus(focus_mark)).unwrap_or_default();
        Detached { dims, scene, focus }
    }

    /// Commits detached output, moved by `at` from this widget's origin.
    pub fn splice(&mut self, detached: Detached, at: Vec2) {
        let mark = self.scene.mark();
        self.scene.splice(detached.scene);
        self.scene.translate_since(mark, at);
        if let Some(router) = self.input.as_deref_mut() {
            router.splice_focus(detached.focus);
        }
    }

    // ── recording ─────────────────────────────────────────────────────────

    pub fn painter(&mut self) -> Painter<'_> {
        Painter::new(self.scene, ZIndex::BASE)
    }

    /// Painter for content that floats above siblings (scrollbars, popups).
    pub fn overlay_painter(&mut self) -> Painter<'_> {
        Painter::new(self.scene, ZIndex::OVERLAY)
    }

    #[inline]
    pub fn mark(&self) -> Mark {
        self.scene.mark()
    }

    #[inline]
    pub fn translate_since(&mut self, mark: Mark, by: Vec2) {
        self.scene.translate_since(mark, by);
    }

    #[inline]
    pub fn translate_range(&mut self, from: Mark, to: Mark, by: Vec2) {
        self.scene.translate_range(from, to, by);
    }

    /// Inserts a command so it paints beneath whatever was recorded after
    /// `mark`. Containers use it for backgrounds sized after their child.
    #[inline]
    pub fn insert_behind(&mut self, mark: Mark, cmd: DrawCmd) {
        self.scene.insert(mark, ZIndex::BASE, cmd);
    }

    // ── text ──────────────────────────────────────────────────────────────

    pub fn measure_text(&self, text: &str, style: &TextStyle, max_width: Option<f32>) -> Vec2 {
        self.frame.metrics.measure(text, style.size, style.line_height(), max_width)
    }

    /// Single-line advance of `text`.
    pub fn text_advance(&self, text: &str, style: &TextStyle) -> f32 {
        self.frame.metrics.advance(text, style.size)
    }

    // ── input ─────────────────────────────────────────────────────────────

    /// Makes `rect` pointer-sensitive for this widget next frame. `part`
    /// tells apart sub-regions such as radio options.
    pub fn register_hit(&mut self, rect: Rect, part: u32) {
        self.scene.push_hit(self.id.to_tag(), part, rect, false);
    }

    /// Like [`register_hit`](Self::register_hit), also accepting wheel input.
    pub fn register_scroll_hit(&mut self, rect: Rect, part: u32) {
        self.scene.push_hit(self.id.to_tag(), part, rect, true);
    }

    /// Wheel-sensitive area beneath everything recorded since `mark`, so
    /// nested scrollables keep priority.
    pub fn register_scroll_hit_behind(&mut self, mark: Mark, rect: Rect, part: u32) {
        self.scene.insert_hit(mark, self.id.to_tag(), part, rect, true);
    }

    /// Joins the Tab focus cycle.
    pub fn register_focusable(&mut self) {
        let id = self.id;
        if let Some(router) = self.input.as_deref_mut() {
            router.register_focusable(id);
        }
    }

    /// `false` for passive frames rendered without input.
    #[inline]
    pub fn interactive(&self) -> bool {
        self.input.is_some()
    }

    /// Drains the events routed to this widget this frame.
    pub fn events(&mut self) -> Vec<UiEvent> {
        let id = self.id;
        self.input.as_deref_mut().map(|r| r.take_events(id)).unwrap_or_default()
    }

    pub fn is_hovered(&self) -> bool {
        self.input.as_deref().is_some_and(|r| r.is_hovered(self.id))
    }

    pub fn hovered_part(&self) -> Option<u32> {
        self.input.as_deref().and_then(|r| r.hovered_part(self.id))
    }

    pub fn is_focused(&self) -> bool {
        self.input.as_deref().is_some_and(|r| r.is_focused(self.id))
    }

    /// `true` while this widget holds the pointer capture.
    pub fn is_captured(&self) -> bool {
        self.input.as_deref().is_some_and(|r| r.is_captured(self.id))
    }

    pub fn request_focus(&mut self) {
        let id = self.id;
        if let Some(router) = self.input.as_deref_mut() {
            router.request_focus(id);
        }
    }

    pub fn release_focus(&mut self) {
        let id = self.id;
        if let Some(router) = self.input.as_deref_mut() {
            router.release_focus(id);
        }
    }

    // ── scheduling ────────────────────────────────────────────────────────

    /// Asks for another frame no later than `at`.
    pub fn invalidate_at(&mut self, at: Instant) {
        *self.redraw_at = Some(match *self.redraw_at {
            Some(cur) => cur.min(at),
            None => at,
        });
    }

    /// Asks for another frame as soon as possible.
    pub fn invalidate(&mut self) {
        let now = self.now();
        self.invalidate_at(now);
    }
}

/// Lays out `root` against `constraints` and records into `scene`.
pub(crate) fn layout_root(
    frame: FrameInfo<'_>,
    tree: &mut WidgetTree,
    scene: &mut DrawList,
    input: Option<&mut InputRouter>,
    redraw_at: &mut Option<Instant>,
    root: WidgetId,
    constraints: Constraints,
) -> Dimensions {
    LayoutCx::new(frame, tree, scene, input, redraw_at, root, constraints).run()
}

#[cfg(test)]
pub(crate) mod testing {
    //! Drives layout without an app loop.

    use std::time::Instant;

    use nenki_engine::coords::Vec2;
    use nenki_engine::input::InputFrame;
    use nenki_engine::scene::DrawList;
    use nenki_engine::text::ApproxMetrics;
    use nenki_engine::time::FrameClock;

    use super::*;

    /// Minimal frame driver: lays out a root, double-buffers scenes and
    /// routes input against the previous frame.
    pub(crate) struct Harness {
        pub tree: WidgetTree,
        pub scene: DrawList,
        prev: DrawList,
        pub router: InputRouter,
        clock: FrameClock,
        pub now: Instant,
        pub redraw_at: Option<Instant>,
        metrics: ApproxMetrics,
    }

    impl Harness {
        pub(crate) fn new() -> Self {
            Self {
                tree: WidgetTree::new(),
                scene: DrawList::new(),
                prev: DrawList::new(),
                router: InputRouter::new(),
                clock: FrameClock::new(),
                now: Instant::now(),
                redraw_at: None,
                metrics: ApproxMetrics::default(),
            }
        }

        pub(crate) fn layout(&mut self, root: impl Into<WidgetId>, constraints: Constraints) -> Dimensions {
            self.frame(root, constraints, Vec::new())
        }

        /// One frame: routes `events` against the last frame's hit areas,
        /// then lays out.
        pub(crate) fn frame(
            &mut self,
            root: impl Into<WidgetId>,
            constraints: Constraints,
            events: Vec<nenki_engine::input::InputEvent>,
        ) -> Dimensions {
            std::mem::swap(&mut self.scene, &mut self.prev);
            self.scene.clear();
            self.router.route(&self.prev, &InputFrame { events, ..Default::default() }, 24.0);
            self.redraw_at = None;
            let frame = FrameInfo {
                time: self.clock.tick_at(self.now),
                scale: 1.0,
                metrics: &self.metrics,
                long_click_threshold: crate::widgets::button::LONG_CLICK_THRESHOLD,
            };
            let dims = layout_root(
                frame,
                &mut self.tree,
                &mut self.scene,
                Some(&mut self.router),
                &mut self.redraw_at,
                root.into(),
                constraints,
            );
            self.tree.collect_garbage();
            let tree = &self.tree;
            self.router.end_frame(|id| tree.contains(id));
            dims
        }

        pub(crate) fn window(w: f32, h: f32) -> Constraints {
            Constraints::tight(Vec2::new(w, h))
        }
    }
}
