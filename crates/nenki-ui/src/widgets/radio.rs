use nenki_engine::coords::{Rect, Vec2};
use nenki_engine::paint::Color;
use nenki_engine::scene::Border;

use crate::constraints::Axis;
use crate::context::LayoutCx;
use crate::event::UiEvent;
use crate::widget::{Dimensions, Widget};

use super::text::TextStyle;
use super::{Handler, fire};

const GAP: f32 = 8.0;
const ITEM_GAP: f32 = 8.0;

/// One choice in a [`RadioButtons`] group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioOption {
    /// Value reported to callbacks.
    pub key: String,
    pub text: String,
}

impl RadioOption {
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self { key: key.into(), text: text.into() }
    }
}

/// Mutually exclusive options laid out along an axis.
///
/// Each option is its own hit region; callbacks receive the option key.
pub struct RadioButtons {
    options: Vec<RadioOption>,
    axis: Axis,
    size: f32,
    text_style: TextStyle,
    mark_color: Color,
    selected: Option<String>,
    prev_selected: Option<String>,
    hovered: Option<String>,
    focused: Option<String>,
    pressed: Option<u32>,
    on_hovered: Handler<RadioButtons, String>,
    on_focused: Handler<RadioButtons, String>,
    on_selected: Handler<RadioButtons, String>,
}

impl RadioButtons {
    pub fn new(options: impl IntoIterator<Item = RadioOption>) -> Self {
        Self {
            options: options.into_iter().collect(),
            axis: Axis::Vertical,
            size: 26.0,
            text_style: TextStyle::new(16.0, Color::BLACK),
            mark_color: Color::from_srgb_u8(0x3f, 0x51, 0xb5, 0xff),
            selected: None,
            prev_selected: None,
            hovered: None,
            focused: None,
            pressed: None,
            on_hovered: None,
            on_focused: None,
            on_selected: None,
        }
    }

    pub fn push_option(&mut self, key: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.options.push(RadioOption::new(key, text));
        self
    }
    /// Selects `key` without firing `on_selected`. Unknown keys clear the
    /// selection.
    pub fn set_selected(&mut self, key: &str) -> &mut Self {
        self.selected = self.options.iter().find(|o| o.key == key).map(|o| o.key.clone());
        self.prev_selected = self.selected.clone();
        self
    }
    pub fn set_axis(&mut self, axis: Axis) -> &mut Self { self.axis = axis; self }
    pub fn set_size(&mut self, size: f32) -> &mut Self { self.size = size.max(0.0); self }
    pub fn set_font_size(&mut self, size: f32) -> &mut Self { self.text_style.size = size; self }
    pub fn set_font_color(&mut self, color: Color) -> &mut Self { self.text_style.color = color; self }
    pub fn set_mark_color(&mut self, color: Color) -> &mut Self { self.mark_color = color; self }

    pub fn options(&self) -> &[RadioOption] { &self.options }
    pub fn selected(&self) -> Option<&str> { self.selected.as_deref() }
    pub fn hovered(&self) -> Option<&str> { self.hovered.as_deref() }
    pub fn focused(&self) -> Option<&str> { self.focused.as_deref() }
    pub fn axis(&self) -> Axis { self.axis }
    pub fn size(&self) -> f32 { self.size }
    pub fn font_color(&self) -> Color { self.text_style.color }
    pub fn mark_color(&self) -> Color { self.mark_color }

    pub fn on_hovered(&mut self, f: impl FnMut(&mut RadioButtons, String) + 'static) -> &mut Self {
        self.on_hovered = Some(Box::new(f));
        self
    }

    pub fn on_focused(&mut self, f: impl FnMut(&mut RadioButtons, String) + 'static) -> &mut Self {
        self.on_focused = Some(Box::new(f));
        self
    }

    pub fn on_selected(&mut self, f: impl FnMut(&mut RadioButtons, String) + 'static) -> &mut Self {
        self.on_selected = Some(Box::new(f));
        self
    }

    fn key_of(&self, part: u32) -> Option<String> {
        self.options.get(part as usize).map(|o| o.key.clone())
    }

    fn handle_input(&mut self, cx: &mut LayoutCx<'_>) {
        let mut focus = self.focused.clone();
        for ev in cx.events() {
            match ev {
                UiEvent::Press { part, .. } => {
                    self.pressed = Some(part);
                    focus = self.key_of(part);
                }
                UiEvent::Release { part, inside, .. } => {
                    if inside && self.pressed == Some(part) {
                        if let Some(key) = self.key_of(part) {
                            self.selected = Some(key);
                        }
                    }
                    self.pressed = None;
                }
                UiEvent::Cancel => self.pressed = None,
                UiEvent::FocusLost => focus = None,
                UiEvent::FocusGained if focus.is_none() => {
                    focus = self.selected.clone().or_else(|| self.key_of(0));
                }
                _ => {}
            }
        }

        let hovered = cx.hovered_part().and_then(|p| self.key_of(p));
        if hovered != self.hovered {
            self.hovered = hovered.clone();
            if let Some(key) = hovered {
                fire(self, |r| &mut r.on_hovered, key);
            }
        }
        if focus != self.focused {
            self.focused = focus.clone();
            if let Some(key) = focus {
                fire(self, |r| &mut r.on_focused, key);
            }
        }
        if self.selected != self.prev_selected {
            self.prev_selected = self.selected.clone();
            if let Some(key) = self.selected.clone() {
                fire(self, |r| &mut r.on_selected, key);
            }
        }
    }
}

impl Widget for RadioButtons {
    fn layout(&mut self, cx: &mut LayoutCx<'_>) -> Dimensions {
        self.handle_input(cx);

        let axis = self.axis;
        let style = self.text_style;
        let mut main = 0.0f32;
        let mut cross = 0.0f32;
        let mut items = Vec::with_capacity(self.options.len());
        for opt in &self.options {
            let text = cx.measure_text(&opt.text, &style, None);
            let item = Vec2::new(self.size + GAP + text.x, self.size.max(text.y));
            if !items.is_empty() {
                main += ITEM_GAP;
            }
            items.push((axis.main(item), item, text));
            main += axis.main(item);
            cross = cross.max(axis.cross(item));
        }
        let size = cx.constraints.constrain(axis.pack(main, cross));

        let mut offset = 0.0;
        for (i, (extent, item, text)) in items.into_iter().enumerate() {
            let origin = axis.pack(offset, 0.0);
            let opt = &self.options[i];
            let selected = self.selected.as_deref() == Some(opt.key.as_str());
            let hovered = self.hovered.as_deref() == Some(opt.key.as_str());
            let r = self.size / 2.0;
            let center = origin + Vec2::new(r, item.y / 2.0);
            let ring = if selected || hovered { self.mark_color } else { style.color.with_alpha(0.6) };

            let mut p = cx.painter();
            p.fill_circle(center, r - 1.0, Color::TRANSPARENT, Some(Border::new(2.0, ring)));
            if selected {
                p.fill_circle(center, r * 0.5, self.mark_color, None);
            }
            p.text(&opt.text, origin + Vec2::new(self.size + GAP, (item.y - text.y) / 2.0), &style, None);
            cx.register_hit(Rect::from_origin_size(origin, item), i as u32);

            offset += extent + ITEM_GAP;
        }
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

    fn group() -> RadioButtons {
        RadioButtons::new([
            RadioOption::new("a", "Alpha"),
            RadioOption::new("b", "Beta"),
            RadioOption::new("c", "Gamma"),
        ])
    }

    #[test]
    fn vertical_group_stacks_options() {
        let mut h = Harness::new();
        let r = h.tree.insert(group());
        let dims = h.layout(r, Constraints::loose(Vec2::new(500.0, 500.0)));
        // Three 26 dp rows with two 8 dp gaps; widest text "Alpha"/"Gamma".
        assert_eq!(dims.size, Vec2::new(26.0 + 8.0 + 40.0, 3.0 * 26.0 + 2.0 * 8.0));
    }

    #[test]
    fn clicking_an_option_selects_it() {
        let mut h = Harness::new();
        let selected = Rc::new(RefCell::new(Vec::new()));
        let focused = Rc::new(RefCell::new(Vec::new()));
        let r = h.tree.insert(group());
        {
            let (s, f) = (Rc::clone(&selected), Rc::clone(&focused));
            let mut w = h.tree.get_mut(r).unwrap();
            w.on_selected(move |_, k| s.borrow_mut().push(k));
            w.on_focused(move |_, k| f.borrow_mut().push(k));
        }
        let area = Constraints::loose(Vec2::new(500.0, 500.0));
        h.layout(r, area);
        // Second row spans y 34..60.
        h.frame(r, area, vec![InputEvent::press(5.0, 40.0), InputEvent::release(5.0, 40.0)]);

        assert_eq!(*selected.borrow(), vec!["b".to_string()]);
        assert_eq!(*focused.borrow(), vec!["b".to_string()]);
        assert_eq!(h.tree.get(r).unwrap().selected(), Some("b"));
    }

    #[test]
    fn hover_reports_option_key() {
        let mut h = Harness::new();
        let hovered = Rc::new(RefCell::new(Vec::new()));
        let r = h.tree.insert(group());
        let log = Rc::clone(&hovered);
        h.tree.get_mut(r).unwrap().on_hovered(move |_, k| log.borrow_mut().push(k));
        let area = Constraints::loose(Vec2::new(500.0, 500.0));
        h.layout(r, area);
        h.frame(r, area, vec![InputEvent::moved(5.0, 70.0)]);
        assert_eq!(*hovered.borrow(), vec!["c".to_string()]);
    }

    #[test]
    fn unknown_key_clears_selection() {
        let mut r = group();
        r.set_selected("b");
        assert_eq!(r.selected(), Some("b"));
        r.set_selected("zzz");
        assert_eq!(r.selected(), None);
    }
}
