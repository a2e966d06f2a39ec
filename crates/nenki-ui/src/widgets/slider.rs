use nenki_engine::coords::{Rect, Vec2};
use nenki_engine::paint::Color;

use crate::constraints::Axis;
use crate::context::LayoutCx;
use crate::event::UiEvent;
use crate::widget::{Dimensions, Widget};

use super::{Handler, fire};

const THUMB_RADIUS: f32 = 6.0;
const TRACK: f32 = 4.0;
const DEFAULT_LENGTH: f32 = 200.0;

/// Value in `[0, 1]` picked by dragging along an axis.
///
/// `on_dragging` fires on every frame the pointer moved the thumb;
/// `on_change` fires when the value differs from the previous frame's.
pub struct Slider {
    value: f32,
    prev: f32,
    axis: Axis,
    color: Color,
    finger_size: f32,
    dragging: bool,
    on_dragging: Handler<Slider, f32>,
    on_change: Handler<Slider, f32>,
}

impl Slider {
    pub fn new(value: f32) -> Self {
        let value = value.clamp(0.0, 1.0);
        Self {
            value,
            prev: value,
            axis: Axis::Horizontal,
            color: Color::from_srgb_u8(0x3f, 0x51, 0xb5, 0xff),
            finger_size: 20.0,
            dragging: false,
            on_dragging: None,
            on_change: None,
        }
    }

    pub fn set_value(&mut self, value: f32) -> &mut Self {
        self.value = value.clamp(0.0, 1.0);
        self.prev = self.value;
        self
    }
    pub fn set_axis(&mut self, axis: Axis) -> &mut Self { self.axis = axis; self }
    pub fn set_color(&mut self, color: Color) -> &mut Self { self.color = color; self }
    /// Cross-axis extent of the touch target.
    pub fn set_finger_size(&mut self, size: f32) -> &mut Self { self.finger_size = size.max(2.0 * THUMB_RADIUS); self }

    pub fn value(&self) -> f32 { self.value }
    pub fn axis(&self) -> Axis { self.axis }
    pub fn color(&self) -> Color { self.color }
    pub fn finger_size(&self) -> f32 { self.finger_size }
    pub fn dragging(&self) -> bool { self.dragging }

    pub fn on_dragging(&mut self, f: impl FnMut(&mut Slider, f32) + 'static) -> &mut Self {
        self.on_dragging = Some(Box::new(f));
        self
    }

    pub fn on_change(&mut self, f: impl FnMut(&mut Slider, f32) + 'static) -> &mut Self {
        self.on_change = Some(Box::new(f));
        self
    }

    fn value_at(&self, pos: Vec2, length: f32) -> f32 {
        let usable = length - 2.0 * THUMB_RADIUS;
        if usable <= 0.0 {
            return self.value;
        }
        ((self.axis.main(pos) - THUMB_RADIUS) / usable).clamp(0.0, 1.0)
    }
}

impl Widget for Slider {
    fn layout(&mut self, cx: &mut LayoutCx<'_>) -> Dimensions {
        let axis = self.axis;
        let max_main = axis.main(cx.constraints.max);
        let main = if max_main.is_finite() { max_main } else { DEFAULT_LENGTH };
        let size = cx.constraints.constrain(axis.pack(main, self.finger_size));
        let length = axis.main(size);

        let mut moved = false;
        for ev in cx.events() {
            match ev {
                UiEvent::Press { pos, .. } | UiEvent::Drag { pos, .. } => {
                    self.dragging = true;
                    self.value = self.value_at(pos, length);
                    moved = true;
                }
                UiEvent::Release { .. } | UiEvent::Cancel => self.dragging = false,
                _ => {}
            }
        }
        if moved {
            let value = self.value;
            fire(self, |s| &mut s.on_dragging, value);
        }
        if self.value != self.prev {
            self.prev = self.value;
            let value = self.value;
            fire(self, |s| &mut s.on_change, value);
        }

        let cross = axis.cross(size);
        let thumb_main = THUMB_RADIUS + self.value * (length - 2.0 * THUMB_RADIUS).max(0.0);
        let track_origin = axis.pack(THUMB_RADIUS, (cross - TRACK) / 2.0);
        let track = Rect::from_origin_size(track_origin, axis.pack((length - 2.0 * THUMB_RADIUS).max(0.0), TRACK));
        let filled = Rect::from_origin_size(track_origin, axis.pack((thumb_main - THUMB_RADIUS).max(0.0), TRACK));
        let radius = if self.dragging || cx.is_hovered() { THUMB_RADIUS * 1.3 } else { THUMB_RADIUS };

        let mut p = cx.painter();
        p.fill_rect(track, self.color.with_alpha(0.38));
        p.fill_rect(filled, self.color);
        p.fill_circle(axis.pack(thumb_main, cross / 2.0), radius, self.color, None);
        cx.register_hit(Rect::from_size(size), 0);
        cx.register_focusable();

        Dimensions::new(size)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use nenki_engine::input::InputEvent;

    use super::*;
    use crate::constraints::Constraints;
    use crate::context::testing::Harness;

    #[test]
    fn takes_full_width_and_finger_height() {
        let mut h = Harness::new();
        let s = h.tree.insert(Slider::new(0.5));
        let dims = h.layout(s, Constraints::loose(Vec2::new(112.0, 100.0)));
        assert_eq!(dims.size, Vec2::new(112.0, 20.0));
    }

    #[test]
    fn drag_updates_value_and_fires_callbacks() {
        let mut h = Harness::new();
        let drags = Rc::new(RefCell::new(Vec::new()));
        let changes = Rc::new(RefCell::new(Vec::new()));
        let s = h.tree.insert(Slider::new(0.0));
        {
            let (d, c) = (Rc::clone(&drags), Rc::clone(&changes));
            let mut w = h.tree.get_mut(s).unwrap();
            w.on_dragging(move |_, v| d.borrow_mut().push(v));
            w.on_change(move |_, v| c.borrow_mut().push(v));
        }
        // Usable track: 6..106 → 100 dp.
        let area = Constraints::loose(Vec2::new(112.0, 100.0));
        h.layout(s, area);
        h.frame(s, area, vec![InputEvent::press(56.0, 10.0)]);
        h.frame(s, area, vec![InputEvent::moved(200.0, 10.0), InputEvent::release(200.0, 10.0)]);

        assert_eq!(*drags.borrow(), vec![0.5, 1.0]);
        assert_eq!(*changes.borrow(), vec![0.5, 1.0]);
        let slider = h.tree.get(s).unwrap();
        assert_eq!(slider.value(), 1.0);
        assert!(!slider.dragging());
    }

    #[test]
    fn vertical_axis_swaps_extent() {
        let mut h = Harness::new();
        let s = h.tree.insert(Slider::new(0.0));
        h.tree.get_mut(s).unwrap().set_axis(Axis::Vertical);
        let dims = h.layout(s, Constraints::loose(Vec2::new(100.0, 80.0)));
        assert_eq!(dims.size, Vec2::new(20.0, 80.0));
    }
}
