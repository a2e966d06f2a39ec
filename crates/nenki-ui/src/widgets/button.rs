use std::time::Duration;

use nenki_engine::coords::{Rect, Vec2};
use nenki_engine::paint::Color;

use crate::constraints::Edges;
use crate::context::LayoutCx;
use crate::gesture::{ClickDisambiguator, ClickEdge, Clickable, Gesture};
use crate::widget::{Dimensions, Widget};

use super::text::TextStyle;
use super::{Handler, fire};

/// Default gap under which two clicks count as a long click.
pub const LONG_CLICK_THRESHOLD: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonStyle {
    pub text: TextStyle,
    pub background: Color,
    pub corner_radius: f32,
    pub inset: Edges,
}

impl Default for ButtonStyle {
    fn default() -> Self {
        Self {
            text: TextStyle::new(16.0, Color::WHITE),
            background: Color::from_srgb_u8(0x3f, 0x51, 0xb5, 0xff),
            corner_radius: 4.0,
            inset: Edges::symmetric(10.0, 12.0),
        }
    }
}

/// Text button.
///
/// Without a long-click handler, `on_click` fires on release. With one,
/// clicks are held back by the long-click threshold to tell a single click
/// from two quick ones.
pub struct Button {
    text: String,
    style: ButtonStyle,
    click: Clickable,
    disambiguator: ClickDisambiguator,
    /// Overrides the app-wide threshold.
    threshold: Option<Duration>,
    on_click: Handler<Button, ()>,
    on_long_click: Handler<Button, ()>,
    on_hovered: Handler<Button, ()>,
    on_pressed: Handler<Button, ()>,
}

impl Button {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: ButtonStyle::default(),
            click: Clickable::new(),
            disambiguator: ClickDisambiguator::new(LONG_CLICK_THRESHOLD),
            threshold: None,
            on_click: None,
            on_long_click: None,
            on_hovered: None,
            on_pressed: None,
        }
    }

    pub fn with_style(mut self, style: ButtonStyle) -> Self { self.style = style; self }

    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self { self.text = text.into(); self }
    pub fn set_font_size(&mut self, size: f32) -> &mut Self { self.style.text.size = size; self }
    pub fn set_text_color(&mut self, color: Color) -> &mut Self { self.style.text.color = color; self }
    pub fn set_background(&mut self, color: Color) -> &mut Self { self.style.background = color; self }
    pub fn set_corner_radius(&mut self, radius: f32) -> &mut Self { self.style.corner_radius = radius; self }
    pub fn set_inset(&mut self, inset: Edges) -> &mut Self { self.style.inset = inset; self }
    pub fn set_long_click_threshold(&mut self, threshold: Duration) -> &mut Self {
        self.threshold = Some(threshold);
        self.disambiguator.set_threshold(threshold);
        self
    }

    pub fn text(&self) -> &str { &self.text }
    pub fn font_size(&self) -> f32 { self.style.text.size }
    pub fn text_color(&self) -> Color { self.style.text.color }
    pub fn background(&self) -> Color { self.style.background }
    pub fn corner_radius(&self) -> f32 { self.style.corner_radius }
    pub fn style(&self) -> &ButtonStyle { &self.style }
    pub fn is_hovered(&self) -> bool { self.click.hovered() }
    pub fn is_pressed(&self) -> bool { self.click.pressed() }
    pub fn is_focused(&self) -> bool { self.click.focused() }

    pub fn on_click(&mut self, f: impl FnMut(&mut Button, ()) + 'static) -> &mut Self {
        self.on_click = Some(Box::new(f));
        self
    }

    /// Two clicks in quick succession. Registering this delays `on_click`.
    pub fn on_long_click(&mut self, f: impl FnMut(&mut Button, ()) + 'static) -> &mut Self {
        self.on_long_click = Some(Box::new(f));
        self
    }

    /// Pointer entered the button.
    pub fn on_hovered(&mut self, f: impl FnMut(&mut Button, ()) + 'static) -> &mut Self {
        self.on_hovered = Some(Box::new(f));
        self
    }

    /// Primary button went down on the button.
    pub fn on_pressed(&mut self, f: impl FnMut(&mut Button, ()) + 'static) -> &mut Self {
        self.on_pressed = Some(Box::new(f));
        self
    }

    fn dispatch(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::Click => fire(self, |b| &mut b.on_click, ()),
            Gesture::LongClick => fire(self, |b| &mut b.on_long_click, ()),
        }
    }

    fn handle_input(&mut self, cx: &mut LayoutCx<'_>) {
        let now = cx.now();
        self.disambiguator.set_threshold(self.threshold.unwrap_or(cx.long_click_threshold()));
        let events = cx.events();
        let edges = self.click.handle(&events, None, now);

        if self.click.set_hovered(cx.is_hovered()) {
            fire(self, |b| &mut b.on_hovered, ());
        }

        for edge in edges {
            match edge {
                ClickEdge::Press => fire(self, |b| &mut b.on_pressed, ()),
                ClickEdge::Click if self.on_long_click.is_some() => {
                    let interval = self.click.last_interval();
                    if let Some(g) = self.disambiguator.completed(interval, now) {
                        self.dispatch(g);
                    }
                }
                ClickEdge::Click => fire(self, |b| &mut b.on_click, ()),
                ClickEdge::Cancel => {}
            }
        }

        if self.on_long_click.is_some() {
            // A held press may still turn into the second click.
            if !self.click.pressed() {
                if let Some(g) = self.disambiguator.poll(now) {
                    self.dispatch(g);
                }
            }
            if let Some(at) = self.disambiguator.deadline() {
                cx.invalidate_at(at);
            }
        } else {
            self.disambiguator.reset();
        }
    }
}

impl Widget for Button {
    fn layout(&mut self, cx: &mut LayoutCx<'_>) -> Dimensions {
        self.handle_input(cx);

        let style = self.style;
        let text_size = cx.measure_text(&self.text, &style.text, None);
        let size = cx.constraints.constrain(text_size + style.inset.size());
        let rect = Rect::from_size(size);

        let background = if self.click.pressed() {
            style.background.lerp(Color::BLACK, 0.2)
        } else if self.click.hovered() {
            style.background.lerp(Color::WHITE, 0.1)
        } else {
            style.background
        };

        let origin = Vec2::new((size.x - text_size.x) / 2.0, (size.y - text_size.y) / 2.0);
        let mut p = cx.painter();
        p.fill_rounded_rect(rect, style.corner_radius, background, None);
        p.text(&self.text, origin, &style.text, None);
        cx.register_hit(rect, 0);
        cx.register_focusable();

        Dimensions { size, baseline: (size.y - origin.y - text_size.y).max(0.0) }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use nenki_engine::input::InputEvent;

    use super::*;
    use crate::constraints::Constraints;
    use crate::context::testing::Harness;

    fn log() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Box<dyn FnMut(&mut Button, ())>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = Rc::clone(&log);
        let make = move |name: &'static str| {
            let l = Rc::clone(&l);
            Box::new(move |_: &mut Button, ()| l.borrow_mut().push(name)) as Box<dyn FnMut(&mut Button, ())>
        };
        (log, make)
    }

    fn loose() -> Constraints {
        Constraints::loose(Vec2::new(300.0, 100.0))
    }

    #[test]
    fn measures_text_plus_inset() {
        let mut h = Harness::new();
        let b = h.tree.insert(Button::new("abcd"));
        let dims = h.layout(b, loose());
        // 4 glyphs × 8 dp, one 19.2 dp line, plus 24 × 20 inset.
        assert_eq!(dims.size.x, 32.0 + 24.0);
        assert!((dims.size.y - (16.0 * 1.2 + 20.0)).abs() < 1e-4);
    }

    #[test]
    fn click_fires_immediately_without_long_click_handler() {
        let mut h = Harness::new();
        let (log, make) = log();
        let b = h.tree.insert(Button::new("ok"));
        {
            let mut w = h.tree.get_mut(b).unwrap();
            w.on_click(make("click"));
            w.on_pressed(make("pressed"));
        }
        h.layout(b, loose());
        h.frame(b, loose(), vec![InputEvent::press(5.0, 5.0), InputEvent::release(5.0, 5.0)]);

        assert_eq!(*log.borrow(), vec!["pressed", "click"]);
    }

    #[test]
    fn long_click_handler_defers_single_click() {
        let mut h = Harness::new();
        let (log, make) = log();
        let b = h.tree.insert(Button::new("ok"));
        {
            let mut w = h.tree.get_mut(b).unwrap();
            w.on_click(make("click"));
            w.on_long_click(make("long"));
        }
        h.layout(b, loose());
        h.frame(b, loose(), vec![InputEvent::press(5.0, 5.0), InputEvent::release(5.0, 5.0)]);
        assert!(log.borrow().is_empty());
        let deadline = h.redraw_at.unwrap();

        h.now = deadline;
        h.layout(b, loose());
        assert_eq!(*log.borrow(), vec!["click"]);
    }

    #[test]
    fn two_quick_clicks_make_a_long_click() {
        let mut h = Harness::new();
        let (log, make) = log();
        let b = h.tree.insert(Button::new("ok"));
        {
            let mut w = h.tree.get_mut(b).unwrap();
            w.on_click(make("click"));
            w.on_long_click(make("long"));
        }
        h.layout(b, loose());
        h.frame(b, loose(), vec![InputEvent::press(5.0, 5.0), InputEvent::release(5.0, 5.0)]);
        h.now += Duration::from_millis(50);
        h.frame(b, loose(), vec![InputEvent::press(5.0, 5.0), InputEvent::release(5.0, 5.0)]);
        h.now += Duration::from_millis(500);
        h.layout(b, loose());

        assert_eq!(*log.borrow(), vec!["long"]);
    }

    #[test]
    fn hover_fires_on_entry() {
        let mut h = Harness::new();
        let (log, make) = log();
        let b = h.tree.insert(Button::new("ok"));
        h.tree.get_mut(b).unwrap().on_hovered(make("hover"));
        h.layout(b, loose());
        h.frame(b, loose(), vec![InputEvent::moved(3.0, 3.0)]);
        h.frame(b, loose(), vec![InputEvent::moved(4.0, 4.0)]);
        assert_eq!(*log.borrow(), vec!["hover"]);
    }
}
