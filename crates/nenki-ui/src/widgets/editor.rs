use nenki_engine::coords::{Rect, Vec2};
use nenki_engine::input::Key;
use nenki_engine::paint::Color;

use crate::context::LayoutCx;
use crate::event::UiEvent;
use crate::gesture::{EditRules, TextEditState};
use crate::widget::{Dimensions, Widget};

use super::text::{Alignment, InputHint, TextStyle, Weight, WrapPolicy};
use super::{Handler, fire};

const CARET_WIDTH: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorStyle {
    pub text: TextStyle,
    pub hint_color: Color,
    pub selection_color: Color,
    pub alignment: Alignment,
}

impl Default for EditorStyle {
    fn default() -> Self {
        Self {
            text: TextStyle::new(16.0, Color::BLACK),
            hint_color: Color::from_srgb_u8(0xbb, 0xbb, 0xbb, 0xff),
            selection_color: Color::from_srgb_u8(0x3f, 0x51, 0xb5, 0x60),
            alignment: Alignment::Start,
        }
    }
}

/// Editable text field.
///
/// Typed input honours the filter, max length and single-line rules.
/// Programmatic edits (`set_text`, `insert`, `delete`, caret moves) never
/// fire callbacks; `on_change` and `on_select` report user input only.
pub struct Editor {
    state: TextEditState,
    rules: EditRules,
    submit: bool,
    hint: String,
    mask: Option<char>,
    wrap: WrapPolicy,
    input_hint: InputHint,
    style: EditorStyle,
    focused: bool,
    wants_focus: bool,
    dragging: bool,
    on_change: Handler<Editor, String>,
    on_submit: Handler<Editor, String>,
    on_select: Handler<Editor, String>,
    on_focused: Handler<Editor, ()>,
}

impl Editor {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            state: TextEditState::new(text),
            rules: EditRules::default(),
            submit: false,
            hint: String::new(),
            mask: None,
            wrap: WrapPolicy::default(),
            input_hint: InputHint::default(),
            style: EditorStyle::default(),
            focused: false,
            wants_focus: false,
            dragging: false,
            on_change: None,
            on_submit: None,
            on_select: None,
            on_focused: None,
        }
    }

    pub fn with_style(mut self, style: EditorStyle) -> Self { self.style = style; self }

    // ── configuration ─────────────────────────────────────────────────────

    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self { self.state.set_text(text); self }
    pub fn set_read_only(&mut self, read_only: bool) -> &mut Self { self.rules.read_only = read_only; self }
    pub fn set_single_line(&mut self, single_line: bool) -> &mut Self { self.rules.single_line = single_line; self }
    /// Enter fires `on_submit` instead of inserting (single-line editors).
    pub fn set_submit(&mut self, submit: bool) -> &mut Self { self.submit = submit; self }
    pub fn set_alignment(&mut self, alignment: Alignment) -> &mut Self { self.style.alignment = alignment; self }
    /// Only these chars are accepted from typing; empty accepts all.
    pub fn set_filter(&mut self, allowed: impl Into<String>) -> &mut Self { self.rules.filter = allowed.into(); self }
    pub fn set_hint(&mut self, hint: impl Into<String>) -> &mut Self { self.hint = hint.into(); self }
    pub fn set_hint_color(&mut self, color: Color) -> &mut Self { self.style.hint_color = color; self }
    pub fn set_line_height(&mut self, height: f32) -> &mut Self { self.style.text.line_height = Some(height); self }
    pub fn set_line_height_scale(&mut self, scale: f32) -> &mut Self { self.style.text.line_height_scale = scale; self }
    /// Draws every char as `mask`, e.g. `'•'` for passwords.
    pub fn set_mask(&mut self, mask: Option<char>) -> &mut Self { self.mask = mask; self }
    /// 0 means unbounded.
    pub fn set_max_len(&mut self, max_len: usize) -> &mut Self { self.rules.max_len = max_len; self }
    pub fn set_wrap_policy(&mut self, wrap: WrapPolicy) -> &mut Self { self.wrap = wrap; self }
    pub fn set_selection_color(&mut self, color: Color) -> &mut Self { self.style.selection_color = color; self }
    pub fn set_font_size(&mut self, size: f32) -> &mut Self { self.style.text.size = size; self }
    pub fn set_weight(&mut self, weight: Weight) -> &mut Self { self.style.text.weight = weight; self }
    pub fn set_text_color(&mut self, color: Color) -> &mut Self { self.style.text.color = color; self }
    pub fn set_input_hint(&mut self, hint: InputHint) -> &mut Self { self.input_hint = hint; self }

    pub fn text(&self) -> &str { self.state.text() }
    /// Length in chars.
    pub fn text_len(&self) -> usize { self.state.len_chars() }
    pub fn read_only(&self) -> bool { self.rules.read_only }
    pub fn single_line(&self) -> bool { self.rules.single_line }
    pub fn submit(&self) -> bool { self.submit }
    pub fn filter(&self) -> &str { &self.rules.filter }
    pub fn hint(&self) -> &str { &self.hint }
    pub fn mask(&self) -> Option<char> { self.mask }
    pub fn max_len(&self) -> usize { self.rules.max_len }
    pub fn wrap_policy(&self) -> WrapPolicy { self.wrap }
    pub fn input_hint(&self) -> InputHint { self.input_hint }
    pub fn style(&self) -> &EditorStyle { &self.style }
    pub fn is_focused(&self) -> bool { self.focused }

    // ── caret and selection ───────────────────────────────────────────────

    /// Places caret and selection end, in chars.
    pub fn set_caret(&mut self, caret: usize, anchor: usize) -> &mut Self { self.state.set_caret(caret, anchor); self }
    pub fn move_caret(&mut self, caret_delta: isize, anchor_delta: isize) -> &mut Self {
        self.state.move_caret(caret_delta, anchor_delta);
        self
    }
    /// `(caret, anchor)` in chars.
    pub fn selection(&self) -> (usize, usize) { self.state.selection() }
    pub fn selection_len(&self) -> usize { self.state.selection_len() }
    pub fn selected_text(&self) -> &str { self.state.selected_text() }
    pub fn clear_selection(&mut self) -> &mut Self {
        let (caret, _) = self.state.selection();
        self.state.set_caret(caret, caret);
        self
    }
    /// Zero-based `(line, column)` of the caret.
    pub fn caret_pos(&self) -> (usize, usize) { self.state.caret_pos() }

    /// Inserts at the caret, replacing the selection. Returns chars inserted.
    pub fn insert(&mut self, text: &str) -> usize {
        let rules = EditRules { read_only: false, ..self.rules.clone() };
        self.state.insert(text, &rules)
    }

    /// Deletes the selection, or `count` chars around the caret (negative
    /// deletes backwards). Returns chars removed.
    pub fn delete(&mut self, count: isize) -> usize { self.state.delete(count) }

    /// Takes keyboard focus on the next frame.
    pub fn focus(&mut self) -> &mut Self { self.wants_focus = true; self }

    // ── callbacks ─────────────────────────────────────────────────────────

    pub fn on_change(&mut self, f: impl FnMut(&mut Editor, String) + 'static) -> &mut Self {
        self.on_change = Some(Box::new(f));
        self
    }

    pub fn on_submit(&mut self, f: impl FnMut(&mut Editor, String) + 'static) -> &mut Self {
        self.on_submit = Some(Box::new(f));
        self
    }

    /// Selection changed through input; receives the selected text.
    pub fn on_select(&mut self, f: impl FnMut(&mut Editor, String) + 'static) -> &mut Self {
        self.on_select = Some(Box::new(f));
        self
    }

    pub fn on_focused(&mut self, f: impl FnMut(&mut Editor, ()) + 'static) -> &mut Self {
        self.on_focused = Some(Box::new(f));
        self
    }

    // ── layout helpers ────────────────────────────────────────────────────

    fn display(&self, s: &str) -> String {
        match self.mask {
            Some(m) => s.chars().map(|c| if c == '\n' { c } else { m }).collect(),
            None => s.to_string(),
        }
    }

    fn advance(&self, cx: &LayoutCx<'_>, s: &str) -> f32 {
        match self.mask {
            Some(_) => cx.text_advance(&self.display(s), &self.style.text),
            None => cx.text_advance(s, &self.style.text),
        }
    }

    fn caret_at(&self, cx: &LayoutCx<'_>, pos: Vec2, width: f32) -> usize {
        let lh = self.style.text.line_height();
        let line = (pos.y / lh).max(0.0) as usize;
        let x = pos.x + self.state.scroll_offset - self.line_offset(cx, line, width);
        self.state.x_to_cursor(line, x, |s| self.advance(cx, s))
    }

    /// Alignment offset of logical line `line`.
    fn line_offset(&self, cx: &LayoutCx<'_>, line: usize, width: f32) -> f32 {
        let content = self.state.text().split('\n').nth(line).unwrap_or("");
        self.style.alignment.offset(width, self.advance(cx, content))
    }

    fn handle_input(&mut self, cx: &mut LayoutCx<'_>, width: f32) {
        if std::mem::take(&mut self.wants_focus) {
            cx.request_focus();
        }
        let before = self.state.selection();
        let mut changed = false;
        let mut submitted = false;
        let mut gained = false;

        for ev in cx.events() {
            match &ev {
                UiEvent::FocusGained => {
                    self.focused = true;
                    gained = true;
                }
                UiEvent::FocusLost => {
                    self.focused = false;
                    self.dragging = false;
                }
                UiEvent::Press { pos, modifiers, .. } => {
                    let at = self.caret_at(cx, *pos, width);
                    self.state.place_cursor(at, modifiers.shift);
                    self.dragging = true;
                }
                UiEvent::Drag { pos, .. } if self.dragging => {
                    let at = self.caret_at(cx, *pos, width);
                    self.state.place_cursor(at, true);
                }
                UiEvent::Release { .. } | UiEvent::Cancel => self.dragging = false,
                UiEvent::Key { key: Key::Escape, .. } => cx.release_focus(),
                UiEvent::Key { key: Key::Enter, .. } if self.rules.single_line && !self.submit => {}
                UiEvent::Key { .. } | UiEvent::Text(_) if self.focused => {
                    let out = self.state.apply(&ev, &self.rules);
                    changed |= out.text_changed;
                    submitted |= out.submit;
                }
                _ => {}
            }
        }

        if gained {
            fire(self, |e| &mut e.on_focused, ());
        }
        if changed {
            let text = self.state.text().to_string();
            fire(self, |e| &mut e.on_change, text);
        }
        if submitted && self.submit {
            let text = self.state.text().to_string();
            fire(self, |e| &mut e.on_submit, text);
        }
        if self.state.selection() != before && self.state.has_selection() {
            let selected = self.state.selected_text().to_string();
            fire(self, |e| &mut e.on_select, selected);
        }
    }
}

impl Widget for Editor {
    fn layout(&mut self, cx: &mut LayoutCx<'_>) -> Dimensions {
        let style = self.style;
        let lh = style.text.line_height();
        let max_w = cx.constraints.max.x;
        let provisional = if max_w.is_finite() { max_w } else { cx.constraints.min.x };

        self.handle_input(cx, provisional);

        let shown = self.display(self.state.text());
        let measured = cx.measure_text(&shown, &style.text, None);
        let natural = Vec2::new(measured.x + CARET_WIDTH, measured.y.max(lh));
        let size = cx.constraints.constrain(natural);
        if self.rules.single_line {
            let mut state = std::mem::take(&mut self.state);
            state.ensure_cursor_visible((size.x - CARET_WIDTH).max(0.0), |s| self.advance(cx, s));
            self.state = state;
        } else {
            self.state.scroll_offset = 0.0;
        }

        let bounds = Rect::from_size(size);
        let scroll = self.state.scroll_offset;
        let text = self.state.text().to_string();
        let (lo, hi) = self.state.sel_range();
        let caret = self.state.cursor_byte();

        // Per logical line: byte start, content and x offset.
        let mut lines = Vec::new();
        let mut start = 0;
        for content in text.split('\n') {
            let x = style.alignment.offset(size.x, self.advance(cx, content)) - scroll;
            lines.push((start, content, x));
            start += content.len() + 1;
        }

        let mut selection = Vec::new();
        let mut caret_rect = None;
        for (i, &(line_start, content, x)) in lines.iter().enumerate() {
            let y = i as f32 * lh;
            let line_end = line_start + content.len();
            if lo < hi && lo <= line_end && hi >= line_start {
                let a = lo.max(line_start) - line_start;
                let b = hi.min(line_end) - line_start;
                let x0 = x + self.advance(cx, &content[..a]);
                let x1 = x + self.advance(cx, &content[..b]);
                selection.push(Rect::new(x0, y, (x1 - x0).max(CARET_WIDTH), lh));
            }
            if (line_start..=line_end).contains(&caret) {
                let cx_ = x + self.advance(cx, &content[..caret - line_start]);
                caret_rect = Some(Rect::new(cx_, y, CARET_WIDTH, lh));
            }
        }

        let focused = self.focused;
        let mut p = cx.painter();
        p.push_clip(bounds);
        for r in selection {
            p.fill_rect(r, style.selection_color);
        }
        if text.is_empty() {
            let hint_style = TextStyle { color: style.hint_color, ..style.text };
            let x = style.alignment.offset(size.x, measured.x);
            p.text(&self.hint, Vec2::new(x, 0.0), &hint_style, Some(size.x));
        } else {
            for (i, (_, content, x)) in lines.iter().enumerate() {
                p.text(&self.display(content), Vec2::new(*x, i as f32 * lh), &style.text, None);
            }
        }
        if focused {
            if let Some(r) = caret_rect {
                p.fill_rect(r, style.text.color);
            }
        }
        p.pop_clip();
        cx.register_hit(bounds, 0);
        cx.register_focusable();

        Dimensions { size, baseline: style.text.baseline_from_bottom() }
    }
}
