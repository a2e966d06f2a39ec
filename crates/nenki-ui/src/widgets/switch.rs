use nenki_engine::coords::{Rect, Vec2};
use nenki_engine::paint::Color;

use crate::context::LayoutCx;
use crate::gesture::{ClickEdge, Clickable};
use crate::widget::{Dimensions, Widget};

use super::{Handler, fire};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwitchStyle {
    /// Thumb colour when on.
    pub enabled: Color,
    /// Thumb colour when off.
    pub disabled: Color,
    pub track: Color,
    pub width: f32,
    pub height: f32,
}

impl Default for SwitchStyle {
    fn default() -> Self {
        Self {
            enabled: Color::from_srgb_u8(0x3f, 0x51, 0xb5, 0xff),
            disabled: Color::WHITE,
            track: Color::from_srgb_u8(0x80, 0x80, 0x80, 0xff),
            width: 36.0,
            height: 20.0,
        }
    }
}

/// On/off switch. `on_change` fires when the value differs from the
/// previous frame's.
pub struct Switch {
    enabled: bool,
    prev: bool,
    style: SwitchStyle,
    click: Clickable,
    on_change: Handler<Switch, bool>,
}

impl Switch {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, prev: enabled, style: SwitchStyle::default(), click: Clickable::new(), on_change: None }
    }

    pub fn with_style(mut self, style: SwitchStyle) -> Self { self.style = style; self }

    pub fn set_enabled(&mut self, enabled: bool) -> &mut Self {
        self.enabled = enabled;
        self.prev = enabled;
        self
    }
    pub fn set_enabled_color(&mut self, color: Color) -> &mut Self { self.style.enabled = color; self }
    pub fn set_disabled_color(&mut self, color: Color) -> &mut Self { self.style.disabled = color; self }
    pub fn set_track_color(&mut self, color: Color) -> &mut Self { self.style.track = color; self }

    pub fn enabled(&self) -> bool { self.enabled }
    pub fn enabled_color(&self) -> Color { self.style.enabled }
    pub fn disabled_color(&self) -> Color { self.style.disabled }
    pub fn track_color(&self) -> Color { self.style.track }

    pub fn on_change(&mut self, f: impl FnMut(&mut Switch, bool) + 'static) -> &mut Self {
        self.on_change = Some(Box::new(f));
        self
    }
}

impl Widget for Switch {
    fn layout(&mut self, cx: &mut LayoutCx<'_>) -> Dimensions {
        let now = cx.now();
        let events = cx.events();
        for edge in self.click.handle(&events, None, now) {
            if edge == ClickEdge::Click {
                self.enabled = !self.enabled;
            }
        }
        self.click.set_hovered(cx.is_hovered());
        if self.enabled != self.prev {
            self.prev = self.enabled;
            let value = self.enabled;
            fire(self, |s| &mut s.on_change, value);
        }

        let s = self.style;
        let size = cx.constraints.constrain(Vec2::new(s.width, s.height));
        let track_h = size.y * 0.6;
        let track = Rect::new(0.0, (size.y - track_h) / 2.0, size.x, track_h);
        let radius = size.y / 2.0;
        let (thumb_x, thumb) = if self.enabled {
            (size.x - radius, s.enabled)
        } else {
            (radius, s.disabled)
        };
        let track_color = if self.enabled { s.enabled.with_alpha(0.5) } else { s.track };

        let mut p = cx.painter();
        p.fill_rounded_rect(track, track_h / 2.0, track_color, None);
        p.fill_circle(Vec2::new(thumb_x, size.y / 2.0), radius, thumb, None);
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
    fn click_flips_and_fires_once() {
        let mut h = Harness::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sw = h.tree.insert(Switch::new(false));
        let log = Rc::clone(&seen);
        h.tree.get_mut(sw).unwrap().on_change(move |_, v| log.borrow_mut().push(v));

        let area = Constraints::loose(Vec2::new(100.0, 100.0));
        h.layout(sw, area);
        h.frame(sw, area, vec![InputEvent::press(10.0, 10.0), InputEvent::release(10.0, 10.0)]);
        h.layout(sw, area);

        assert_eq!(*seen.borrow(), vec![true]);
        assert!(h.tree.get(sw).unwrap().enabled());
    }

    #[test]
    fn change_made_inside_callback_is_reported_next_frame() {
        let mut h = Harness::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sw = h.tree.insert(Switch::new(false));
        let log = Rc::clone(&seen);
        h.tree.get_mut(sw).unwrap().on_change(move |s, v| {
            log.borrow_mut().push(v);
            // Refuse to stay on.
            if v {
                s.enabled = false;
            }
        });

        let area = Constraints::loose(Vec2::new(100.0, 100.0));
        h.layout(sw, area);
        h.frame(sw, area, vec![InputEvent::press(10.0, 10.0), InputEvent::release(10.0, 10.0)]);
        h.layout(sw, area);

        assert_eq!(*seen.borrow(), vec![true, false]);
    }
}
