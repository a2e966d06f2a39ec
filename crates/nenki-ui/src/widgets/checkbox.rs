use nenki_engine::coords::{Rect, Vec2};
use nenki_engine::paint::Color;
use nenki_engine::scene::Border;

use crate::context::LayoutCx;
use crate::gesture::{ClickEdge, Clickable};
use crate::widget::{Dimensions, Widget};

use super::text::TextStyle;
use super::{Handler, fire};

const MIN_SIZE: f32 = 16.0;
const MAX_SIZE: f32 = 30.0;
const GAP: f32 = 8.0;

/// Check box with a text label. Clicking anywhere on it toggles.
///
/// `on_change` fires when the value differs from the previous frame's;
/// [`set_checked`](Self::set_checked) does not fire it.
pub struct CheckBox {
    text: String,
    checked: bool,
    prev: bool,
    size: f32,
    text_style: TextStyle,
    mark_color: Color,
    click: Clickable,
    on_change: Handler<CheckBox, bool>,
    on_hovered: Handler<CheckBox, ()>,
    on_pressed: Handler<CheckBox, ()>,
}

impl CheckBox {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            checked: false,
            prev: false,
            size: 26.0,
            text_style: TextStyle::new(16.0, Color::BLACK),
            mark_color: Color::from_srgb_u8(0x3f, 0x51, 0xb5, 0xff),
            click: Clickable::new(),
            on_change: None,
            on_hovered: None,
            on_pressed: None,
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self { self.text = text.into(); self }
    pub fn set_checked(&mut self, checked: bool) -> &mut Self {
        self.checked = checked;
        self.prev = checked;
        self
    }
    /// Box side in dp, clamped to 16..=30.
    pub fn set_size(&mut self, size: f32) -> &mut Self { self.size = size.clamp(MIN_SIZE, MAX_SIZE); self }
    pub fn set_font_size(&mut self, size: f32) -> &mut Self { self.text_style.size = size; self }
    pub fn set_font_color(&mut self, color: Color) -> &mut Self { self.text_style.color = color; self }
    pub fn set_mark_color(&mut self, color: Color) -> &mut Self { self.mark_color = color; self }

    pub fn text(&self) -> &str { &self.text }
    pub fn checked(&self) -> bool { self.checked }
    pub fn size(&self) -> f32 { self.size }
    pub fn font_color(&self) -> Color { self.text_style.color }
    pub fn mark_color(&self) -> Color { self.mark_color }
    pub fn focused(&self) -> bool { self.click.focused() }
    pub fn hovered(&self) -> bool { self.click.hovered() }

    pub fn on_change(&mut self, f: impl FnMut(&mut CheckBox, bool) + 'static) -> &mut Self {
        self.on_change = Some(Box::new(f));
        self
    }

    pub fn on_hovered(&mut self, f: impl FnMut(&mut CheckBox, ()) + 'static) -> &mut Self {
        self.on_hovered = Some(Box::new(f));
        self
    }

    pub fn on_pressed(&mut self, f: impl FnMut(&mut CheckBox, ()) + 'static) -> &mut Self {
        self.on_pressed = Some(Box::new(f));
        self
    }
}

impl Widget for CheckBox {
    fn layout(&mut self, cx: &mut LayoutCx<'_>) -> Dimensions {
        let now = cx.now();
        let events = cx.events();
        for edge in self.click.handle(&events, None, now) {
            match edge {
                ClickEdge::Press => fire(self, |c| &mut c.on_pressed, ()),
                ClickEdge::Click => self.checked = !self.checked,
                ClickEdge::Cancel => {}
            }
        }
        if self.click.set_hovered(cx.is_hovered()) {
            fire(self, |c| &mut c.on_hovered, ());
        }
        if self.checked != self.prev {
            self.prev = self.checked;
            let value = self.checked;
            fire(self, |c| &mut c.on_change, value);
        }

        let text_size = if self.text.is_empty() {
            Vec2::ZERO
        } else {
            cx.measure_text(&self.text, &self.text_style, None)
        };
        let gap = if self.text.is_empty() { 0.0 } else { GAP };
        let natural = Vec2::new(self.size + gap + text_size.x, self.size.max(text_size.y));
        let size = cx.constraints.constrain(natural);

        let box_rect = Rect::new(0.0, (size.y - self.size) / 2.0, self.size, self.size);
        let outline = if self.click.hovered() { self.mark_color } else { self.text_style.color.with_alpha(0.6) };
        let style = self.text_style;
        let mut p = cx.painter();
        if self.checked {
            p.fill_rounded_rect(box_rect, 3.0, self.mark_color, None);
            let inset = self.size * 0.28;
            let tick = Rect::new(box_rect.origin.x + inset, box_rect.origin.y + inset, self.size - 2.0 * inset, self.size - 2.0 * inset);
            p.fill_rounded_rect(tick, 1.0, Color::WHITE, None);
        } else {
            p.fill_rounded_rect(box_rect, 3.0, Color::TRANSPARENT, Some(Border::new(2.0, outline)));
        }
        p.text(&self.text, Vec2::new(self.size + gap, (size.y - text_size.y) / 2.0), &style, None);
        cx.register_hit(Rect::from_size(size), 0);
        cx.register_focusable();

        Dimensions { size, baseline: (size.y - text_size.y) / 2.0 + style.baseline_from_bottom() }
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
    fn size_is_clamped() {
        let mut c = CheckBox::new("x");
        assert_eq!(c.set_size(4.0).size(), 16.0);
        assert_eq!(c.set_size(64.0).size(), 30.0);
    }

    #[test]
    fn click_toggles_and_reports_change() {
        let mut h = Harness::new();
        let changes = Rc::new(RefCell::new(Vec::new()));
        let c = h.tree.insert(CheckBox::new("opt"));
        let log = Rc::clone(&changes);
        h.tree.get_mut(c).unwrap().on_change(move |_, v| log.borrow_mut().push(v));

        let area = Constraints::loose(Vec2::new(200.0, 50.0));
        h.layout(c, area);
        h.frame(c, area, vec![InputEvent::press(5.0, 5.0), InputEvent::release(5.0, 5.0)]);
        h.frame(c, area, vec![InputEvent::press(5.0, 5.0), InputEvent::release(5.0, 5.0)]);

        assert_eq!(*changes.borrow(), vec![true, false]);
        assert!(!h.tree.get(c).unwrap().checked());
    }

    #[test]
    fn programmatic_set_is_silent() {
        let mut h = Harness::new();
        let fired = Rc::new(RefCell::new(0));
        let c = h.tree.insert(CheckBox::new("opt"));
        let count = Rc::clone(&fired);
        {
            let mut w = h.tree.get_mut(c).unwrap();
            w.on_change(move |_, _| *count.borrow_mut() += 1);
            w.set_checked(true);
        }
        h.layout(c, Constraints::loose(Vec2::new(200.0, 50.0)));
        assert_eq!(*fired.borrow(), 0);
        assert!(h.tree.get(c).unwrap().checked());
    }
}
