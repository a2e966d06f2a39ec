//! Routes a frame's raw input to widgets.
//!
//! Hit areas come from the previous frame's draw list: that is what the
//! user saw when they clicked. Routed events wait in per-widget queues
//! until the widget drains them during layout.
//!
//! Rules:
//! - a press captures the pointer for the hit widget; drags and the release
//!   go to the capturing widget wherever the pointer is
//! - a press also moves keyboard focus to the pressed widget, or clears it
//!   when nothing was hit
//! - keys and text go to the focused widget; Tab and Shift+Tab cycle focus
//!   through widgets that registered as focusable last frame
//! - wheel input goes to the topmost scroll-accepting area under the pointer

use std::collections::HashMap;

use nenki_engine::coords::{Rect, Vec2};
use nenki_engine::input::{
    InputEvent, InputFrame, Key, KeyState, MouseButton, MouseButtonState, MouseWheelDelta,
};
use nenki_engine::scene::DrawList;

use crate::event::UiEvent;
use crate::tree::WidgetId;

#[derive(Debug, Clone, Copy)]
struct Capture {
    id: WidgetId,
    part: u32,
    origin: Vec2,
    visible: Option<Rect>,
}

/// Pointer capture, hover and keyboard focus for the widget tree.
#[derive(Debug, Default)]
pub struct InputRouter {
    queues: HashMap<WidgetId, Vec<UiEvent>>,
    pointer: Option<Vec2>,
    hovered: Option<(WidgetId, u32)>,
    capture: Option<Capture>,
    focused: Option<WidgetId>,

    /// Tab order seen during the last layout pass.
    focusable: Vec<WidgetId>,
    next_focusable: Vec<WidgetId>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes `input` against the hit areas recorded in `hits`.
    ///
    /// Pointer and key events left unread from the previous frame are
    /// dropped. Focus changes survive until read.
    pub fn route(&mut self, hits: &DrawList, input: &InputFrame, scroll_line: f32) {
        for queue in self.queues.values_mut() {
            queue.retain(UiEvent::is_focus_change);
        }
        self.queues.retain(|_, q| !q.is_empty());

        for ev in &input.events {
            self.route_one(hits, ev, scroll_line);
        }

        self.hovered = self
            .pointer
            .and_then(|p| hits.hit_test(p))
            .map(|h| (WidgetId::from_tag(h.tag), h.part));
    }

    fn route_one(&mut self, hits: &DrawList, ev: &InputEvent, scroll_line: f32) {
        match ev {
            InputEvent::PointerMoved(m) => {
                let p = Vec2::new(m.x, m.y);
                self.pointer = Some(p);
                if let Some(cap) = self.capture {
                    self.push(cap.id, UiEvent::Drag { pos: p - cap.origin, part: cap.part });
                }
            }
            InputEvent::PointerLeft => self.pointer = None,
            InputEvent::PointerButton(b) if b.button == MouseButton::Left => {
                let p = Vec2::new(b.x, b.y);
                self.pointer = Some(p);
                match b.state {
                    MouseButtonState::Pressed => match hits.hit_test(p).copied() {
                        Some(hit) => {
                            let id = WidgetId::from_tag(hit.tag);
                            self.capture = Some(Capture {
                                id,
                                part: hit.part,
                                origin: hit.rect.origin,
                                visible: hits.hit_rect(&hit),
                            });
                            self.set_focus(Some(id));
                            self.push(
                                id,
                                UiEvent::Press { pos: p - hit.rect.origin, part: hit.part, modifiers: b.modifiers },
                            );
                        }
                        None => self.set_focus(None),
                    },
                    MouseButtonState::Released => {
                        if let Some(cap) = self.capture.take() {
                            let inside = cap.visible.is_some_and(|r| r.contains(p));
                            self.push(cap.id, UiEvent::Release { pos: p - cap.origin, part: cap.part, inside });
                        }
                    }
                }
            }
            InputEvent::MouseWheel { delta, .. } => {
                let Some(p) = self.pointer else { return };
                let Some(hit) = hits.hit_test_scroll(p).copied() else { return };
                let delta = match *delta {
                    MouseWheelDelta::Line { x, y } => Vec2::new(x, y) * scroll_line,
                    MouseWheelDelta::Pixel { x, y } => Vec2::new(x, y),
                };
                self.push(WidgetId::from_tag(hit.tag), UiEvent::Scroll { delta, part: hit.part });
            }
            InputEvent::Key { key: Key::Tab, state: KeyState::Pressed, modifiers, .. } => {
                self.cycle_focus(!modifiers.shift);
            }
            InputEvent::Key { key, state: KeyState::Pressed, modifiers, .. } => {
                if let Some(id) = self.focused {
                    self.push(id, UiEvent::Key { key: *key, modifiers: *modifiers });
                }
            }
            InputEvent::Text(t) => {
                if let Some(id) = self.focused {
                    self.push(id, UiEvent::Text(t.text.clone()));
                }
            }
            InputEvent::Focused(false) => {
                if let Some(cap) = self.capture.take() {
                    self.push(cap.id, UiEvent::Cancel);
                }
            }
            _ => {}
        }
    }

    fn push(&mut self, id: WidgetId, ev: UiEvent) {
        self.queues.entry(id).or_default().push(ev);
    }

    fn set_focus(&mut self, next: Option<WidgetId>) {
        if next == self.focused {
            return;
        }
        if let Some(old) = self.focused {
            self.push(old, UiEvent::FocusLost);
        }
        if let Some(new) = next {
            self.push(new, UiEvent::FocusGained);
        }
        self.focused = next;
    }

    fn cycle_focus(&mut self, forward: bool) {
        let n = self.focusable.len();
        if n == 0 {
            return;
        }
        let current = self.focused.and_then(|f| self.focusable.iter().position(|&id| id == f));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => n - 1,
            (Some(i), true) => (i + 1) % n,
            (Some(i), false) => (i + n - 1) % n,
        };
        let id = self.focusable[next];
        self.set_focus(Some(id));
    }

    // ── layout-time queries ───────────────────────────────────────────────

    /// Drains the events routed to `id`.
    pub fn take_events(&mut self, id: WidgetId) -> Vec<UiEvent> {
        self.queues.remove(&id).unwrap_or_default()
    }

    #[inline]
    pub fn is_hovered(&self, id: WidgetId) -> bool {
        self.hovered.is_some_and(|(h, _)| h == id)
    }

    /// Part under the pointer when `id` is hovered.
    #[inline]
    pub fn hovered_part(&self, id: WidgetId) -> Option<u32> {
        self.hovered.and_then(|(h, part)| (h == id).then_some(part))
    }

    /// `true` while `id` holds the pointer capture.
    #[inline]
    pub fn is_captured(&self, id: WidgetId) -> bool {
        self.capture.is_some_and(|c| c.id == id)
    }

    #[inline]
    pub fn is_focused(&self, id: WidgetId) -> bool {
        self.focused == Some(id)
    }

    #[inline]
    pub fn focused(&self) -> Option<WidgetId> {
        self.focused
    }

    pub fn request_focus(&mut self, id: WidgetId) {
        self.set_focus(Some(id));
    }

    pub fn release_focus(&mut self, id: WidgetId) {
        if self.focused == Some(id) {
            self.set_focus(None);
        }
    }

    pub(crate) fn register_focusable(&mut self, id: WidgetId) {
        self.next_focusable.push(id);
    }

    pub(crate) fn focus_mark(&self) -> usize {
        self.next_focusable.len()
    }

    /// Takes the registrations made since `mark` out of this frame's order.
    pub(crate) fn detach_focus(&mut self, mark: usize) -> Vec<WidgetId> {
        self.next_focusable.split_off(mark.min(self.next_focusable.len()))
    }

    pub(crate) fn splice_focus(&mut self, ids: Vec<WidgetId>) {
        self.next_focusable.extend(ids);
    }

    /// Closes the layout pass: publishes this frame's tab order and forgets
    /// widgets that no longer exist.
    pub(crate) fn end_frame(&mut self, is_live: impl Fn(WidgetId) -> bool) {
        std::mem::swap(&mut self.focusable, &mut self.next_focusable);
        self.next_focusable.clear();
        self.focusable.retain(|&id| is_live(id));
        self.queues.retain(|&id, _| is_live(id));
        if self.focused.is_some_and(|id| !is_live(id)) {
            self.focused = None;
        }
        if self.capture.is_some_and(|c| !is_live(c.id)) {
            self.capture = None;
        }
        if self.hovered.is_some_and(|(id, _)| !is_live(id)) {
            self.hovered = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use nenki_engine::input::{InputEvent, Modifiers};
    use nenki_engine::scene::HitTag;
    use slotmap::SlotMap;

    use super::*;

    fn ids(n: usize) -> Vec<WidgetId> {
        let mut map: SlotMap<WidgetId, ()> = SlotMap::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    fn frame(events: Vec<InputEvent>) -> InputFrame {
        InputFrame { events, ..Default::default() }
    }

    fn scene_with(areas: &[(WidgetId, Rect, bool)]) -> DrawList {
        let mut list = DrawList::new();
        for (id, rect, scroll) in areas {
            list.push_hit(id.to_tag(), 0, *rect, *scroll);
        }
        list
    }

    // ── pointer ───────────────────────────────────────────────────────────

    #[test]
    fn press_and_release_go_to_the_pressed_widget() {
        let w = ids(1);
        let scene = scene_with(&[(w[0], Rect::new(10.0, 10.0, 50.0, 20.0), false)]);
        let mut router = InputRouter::new();

        router.route(&scene, &frame(vec![InputEvent::press(15.0, 12.0), InputEvent::release(20.0, 15.0)]), 24.0);

        let events = router.take_events(w[0]);
        assert!(matches!(events[0], UiEvent::FocusGained));
        assert_eq!(
            events[1],
            UiEvent::Press { pos: Vec2::new(5.0, 2.0), part: 0, modifiers: Modifiers::default() }
        );
        assert_eq!(events[2], UiEvent::Release { pos: Vec2::new(10.0, 5.0), part: 0, inside: true });
    }

    #[test]
    fn capture_follows_pointer_outside() {
        let w = ids(2);
        let scene = scene_with(&[
            (w[0], Rect::new(0.0, 0.0, 10.0, 10.0), false),
            (w[1], Rect::new(20.0, 0.0, 10.0, 10.0), false),
        ]);
        let mut router = InputRouter::new();
        router.route(
            &scene,
            &frame(vec![InputEvent::press(5.0, 5.0), InputEvent::moved(25.0, 5.0), InputEvent::release(25.0, 5.0)]),
            24.0,
        );

        let first = router.take_events(w[0]);
        assert!(first.iter().any(|e| matches!(e, UiEvent::Drag { .. })));
        assert!(first.iter().any(|e| matches!(e, UiEvent::Release { inside: false, .. })));
        assert!(router.take_events(w[1]).is_empty());
        assert!(router.is_hovered(w[1]));
    }

    #[test]
    fn wheel_goes_to_scroll_area_and_scales_lines() {
        let w = ids(2);
        let scene = scene_with(&[
            (w[0], Rect::new(0.0, 0.0, 100.0, 100.0), true),
            (w[1], Rect::new(0.0, 0.0, 20.0, 20.0), false),
        ]);
        let mut router = InputRouter::new();
        let wheel = InputEvent::MouseWheel {
            delta: MouseWheelDelta::Line { x: 0.0, y: 2.0 },
            modifiers: Modifiers::default(),
        };
        router.route(&scene, &frame(vec![InputEvent::moved(5.0, 5.0), wheel]), 10.0);

        assert_eq!(
            router.take_events(w[0]),
            vec![UiEvent::Scroll { delta: Vec2::new(0.0, 20.0), part: 0 }]
        );
    }

    #[test]
    fn window_focus_loss_cancels_capture() {
        let w = ids(1);
        let scene = scene_with(&[(w[0], Rect::new(0.0, 0.0, 10.0, 10.0), false)]);
        let mut router = InputRouter::new();
        router.route(&scene, &frame(vec![InputEvent::press(1.0, 1.0), InputEvent::Focused(false)]), 24.0);

        assert!(router.take_events(w[0]).contains(&UiEvent::Cancel));
        assert!(!router.is_captured(w[0]));
    }

    // ── focus ─────────────────────────────────────────────────────────────

    #[test]
    fn pressing_elsewhere_moves_focus() {
        let w = ids(2);
        let scene = scene_with(&[
            (w[0], Rect::new(0.0, 0.0, 10.0, 10.0), false),
            (w[1], Rect::new(20.0, 0.0, 10.0, 10.0), false),
        ]);
        let mut router = InputRouter::new();
        router.route(&scene, &frame(vec![InputEvent::press(1.0, 1.0), InputEvent::release(1.0, 1.0)]), 24.0);
        router.take_events(w[0]);

        router.route(&scene, &frame(vec![InputEvent::press(21.0, 1.0)]), 24.0);

        assert_eq!(router.take_events(w[0]), vec![UiEvent::FocusLost]);
        assert!(router.is_focused(w[1]));
    }

    #[test]
    fn keys_and_text_go_to_focused_widget() {
        let w = ids(1);
        let mut router = InputRouter::new();
        router.request_focus(w[0]);
        router.route(&DrawList::new(), &frame(vec![InputEvent::key(Key::A), InputEvent::text("a")]), 24.0);

        let events = router.take_events(w[0]);
        assert!(events.contains(&UiEvent::FocusGained));
        assert!(events.contains(&UiEvent::Key { key: Key::A, modifiers: Modifiers::default() }));
        assert!(events.contains(&UiEvent::Text("a".into())));
    }

    #[test]
    fn tab_cycles_registered_widgets() {
        let w = ids(3);
        let mut router = InputRouter::new();
        for id in &w {
            router.register_focusable(*id);
        }
        router.end_frame(|_| true);

        router.route(&DrawList::new(), &frame(vec![InputEvent::key(Key::Tab)]), 24.0);
        assert!(router.is_focused(w[0]));
        router.route(&DrawList::new(), &frame(vec![InputEvent::key(Key::Tab)]), 24.0);
        assert!(router.is_focused(w[1]));
    }

    #[test]
    fn dead_widgets_are_forgotten() {
        let w = ids(1);
        let mut router = InputRouter::new();
        router.request_focus(w[0]);
        router.end_frame(|_| false);
        assert_eq!(router.focused(), None);
        assert!(router.take_events(w[0]).is_empty());
    }

    #[test]
    fn tag_round_trips_to_widget_id() {
        let w = ids(1);
        assert_eq!(WidgetId::from_tag(w[0].to_tag()), w[0]);
        assert_ne!(w[0].to_tag(), HitTag(0));
    }
}
