use nenki_engine::input::{Key, Modifiers};

use crate::event::UiEvent;

/// Limits applied to every edit. Navigation ignores them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditRules {
    /// Newlines are dropped from input and Enter does not insert.
    pub single_line: bool,
    /// Upper bound in chars; 0 means unbounded.
    pub max_len: usize,
    /// When non-empty, only these chars are accepted.
    pub filter: String,
    pub read_only: bool,
}

impl EditRules {
    fn accepts(&self, c: char) -> bool {
        if self.single_line && (c == '\n' || c == '\r') {
            return false;
        }
        self.filter.is_empty() || self.filter.contains(c)
    }
}

/// What one event did to the state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditOutcome {
    pub consumed: bool,
    pub text_changed: bool,
    /// Enter pressed on a single-line editor.
    pub submit: bool,
}

/// Text buffer with caret and selection.
///
/// Offsets kept here are UTF-8 byte offsets on char boundaries. The public
/// selection API speaks in chars.
#[derive(Debug, Clone, Default)]
pub struct TextEditState {
    text: String,
    /// Caret position.
    cursor: usize,
    /// Selection anchor. `cursor == anchor` means no selection.
    anchor: usize,
    /// Horizontal offset the text is scrolled by, in dp.
    pub scroll_offset: f32,
}

impl TextEditState {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = text.len();
        Self { text, cursor: end, anchor: end, scroll_offset: 0.0 }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the whole text and moves the caret to the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.text.len();
        self.anchor = self.cursor;
        self.scroll_offset = 0.0;
    }

    pub fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    #[inline]
    pub fn cursor_byte(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn anchor_byte(&self) -> usize {
        self.anchor
    }

    /// Sorted byte range of the selection.
    #[inline]
    pub fn sel_range(&self) -> (usize, usize) {
        (self.cursor.min(self.anchor), self.cursor.max(self.anchor))
    }

    #[inline]
    pub fn has_selection(&self) -> bool {
        self.cursor != self.anchor
    }

    // ── char-indexed selection ────────────────────────────────────────────

    /// `(caret, anchor)` in chars.
    pub fn selection(&self) -> (usize, usize) {
        (char_index(&self.text, self.cursor), char_index(&self.text, self.anchor))
    }

    pub fn selection_len(&self) -> usize {
        let (a, b) = self.selection();
        a.abs_diff(b)
    }

    pub fn selected_text(&self) -> &str {
        let (lo, hi) = self.sel_range();
        &self.text[lo..hi]
    }

    /// Places caret and anchor, in chars, clamped to the text.
    pub fn set_caret(&mut self, caret: usize, anchor: usize) {
        self.cursor = byte_index(&self.text, caret);
        self.anchor = byte_index(&self.text, anchor);
    }

    /// Moves caret and anchor by the given char counts.
    pub fn move_caret(&mut self, caret_delta: isize, anchor_delta: isize) {
        let (caret, anchor) = self.selection();
        let shift = |v: usize, d: isize| v.saturating_add_signed(d);
        self.set_caret(shift(caret, caret_delta), shift(anchor, anchor_delta));
    }

    /// Zero-based `(line, column)` of the caret, column in chars.
    pub fn caret_pos(&self) -> (usize, usize) {
        let before = &self.text[..self.cursor];
        let line = before.matches('\n').count();
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        (line, before[line_start..].chars().count())
    }

    // ── cursor movement ───────────────────────────────────────────────────

    /// One char left; collapses a selection to its left edge without shift.
    pub fn move_left(&mut self, shift: bool) {
        if !shift && self.has_selection() {
            let left = self.sel_range().0;
            self.cursor = left;
            self.anchor = left;
        } else {
            self.cursor = prev_char(&self.text, self.cursor);
            if !shift {
                self.anchor = self.cursor;
            }
        }
    }

    pub fn move_right(&mut self, shift: bool) {
        if !shift && self.has_selection() {
            let right = self.sel_range().1;
            self.cursor = right;
            self.anchor = right;
        } else {
            self.cursor = next_char(&self.text, self.cursor);
            if !shift {
                self.anchor = self.cursor;
            }
        }
    }

    pub fn move_word_left(&mut self, shift: bool) {
        self.cursor = prev_word(&self.text, self.cursor);
        if !shift {
            self.anchor = self.cursor;
        }
    }

    pub fn move_word_right(&mut self, shift: bool) {
        self.cursor = next_word(&self.text, self.cursor);
        if !shift {
            self.anchor = self.cursor;
        }
    }

    /// Start of the current line.
    pub fn move_home(&mut self, shift: bool) {
        self.cursor = self.text[..self.cursor].rfind('\n').map_or(0, |i| i + 1);
        if !shift {
            self.anchor = self.cursor;
        }
    }

    /// End of the current line.
    pub fn move_end(&mut self, shift: bool) {
        self.cursor = self.text[self.cursor..].find('\n').map_or(self.text.len(), |i| self.cursor + i);
        if !shift {
            self.anchor = self.cursor;
        }
    }

    /// Same column on the previous (`up`) or next line, clamped to its length.
    pub fn move_line(&mut self, up: bool, shift: bool) {
        let (line, col) = self.caret_pos();
        let target = if up {
            match line.checked_sub(1) {
                Some(l) => l,
                None => {
                    self.cursor = 0;
                    if !shift {
                        self.anchor = 0;
                    }
                    return;
                }
            }
        } else {
            line + 1
        };
        let Some((start, content)) = line_span(&self.text, target) else {
            self.cursor = self.text.len();
            if !shift {
                self.anchor = self.cursor;
            }
            return;
        };
        self.cursor = start + byte_index(content, col);
        if !shift {
            self.anchor = self.cursor;
        }
    }

    pub fn select_all(&mut self) {
        self.anchor = 0;
        self.cursor = self.text.len();
    }

    // ── editing ───────────────────────────────────────────────────────────

    /// Inserts `s` at the caret, replacing the selection. Chars the rules
    /// reject are skipped and `max_len` truncates. Returns the number of
    /// chars inserted.
    pub fn insert(&mut self, s: &str, rules: &EditRules) -> usize {
        let removed = self.selection_len();
        let room = match rules.max_len {
            0 => usize::MAX,
            max => max.saturating_sub(self.len_chars() - removed),
        };
        let accepted: String = s.chars().filter(|&c| rules.accepts(c)).take(room).collect();
        if accepted.is_empty() {
            return 0;
        }
        self.delete_selection();
        self.text.insert_str(self.cursor, &accepted);
        self.cursor += accepted.len();
        self.anchor = self.cursor;
        accepted.chars().count()
    }

    /// Deletes the selection if there is one, otherwise `count` chars after
    /// the caret (positive) or before it (negative). Returns chars removed.
    pub fn delete(&mut self, count: isize) -> usize {
        if self.has_selection() {
            let n = self.selection_len();
            self.delete_selection();
            return n;
        }
        let mut removed = 0;
        if count < 0 {
            for _ in 0..count.unsigned_abs() {
                if self.cursor == 0 {
                    break;
                }
                let prev = prev_char(&self.text, self.cursor);
                self.text.drain(prev..self.cursor);
                self.cursor = prev;
                removed += 1;
            }
        } else {
            for _ in 0..count {
                if self.cursor >= self.text.len() {
                    break;
                }
                let next = next_char(&self.text, self.cursor);
                self.text.drain(self.cursor..next);
                removed += 1;
            }
        }
        self.anchor = self.cursor;
        removed
    }

    fn delete_selection(&mut self) -> bool {
        if !self.has_selection() {
            return false;
        }
        let (lo, hi) = self.sel_range();
        self.text.drain(lo..hi);
        self.cursor = lo;
        self.anchor = lo;
        true
    }

    // ── event handling ────────────────────────────────────────────────────

    /// Applies a key or text event. Pointer events are left to the widget,
    /// which knows where the text is drawn.
    pub fn apply(&mut self, event: &UiEvent, rules: &EditRules) -> EditOutcome {
        match event {
            UiEvent::Text(text) => {
                if rules.read_only {
                    return EditOutcome { consumed: true, ..Default::default() };
                }
                let changed = self.insert(text, rules) > 0;
                EditOutcome { consumed: true, text_changed: changed, submit: false }
            }
            UiEvent::Key { key, modifiers } => self.apply_key(*key, *modifiers, rules),
            _ => EditOutcome::default(),
        }
    }

    fn apply_key(&mut self, key: Key, modifiers: Modifiers, rules: &EditRules) -> EditOutcome {
        let shift = modifiers.shift;
        let word = modifiers.ctrl || modifiers.alt;
        let moved = EditOutcome { consumed: true, ..Default::default() };
        let edited = |changed: bool| EditOutcome { consumed: true, text_changed: changed, submit: false };

        match key {
            Key::Backspace if !rules.read_only => edited(self.delete(-1) > 0),
            Key::Delete if !rules.read_only => edited(self.delete(1) > 0),
            Key::Enter if rules.single_line => EditOutcome { consumed: true, text_changed: false, submit: true },
            Key::Enter if !rules.read_only => edited(self.insert("\n", rules) > 0),
            Key::ArrowLeft if word => {
                self.move_word_left(shift);
                moved
            }
            Key::ArrowLeft => {
                self.move_left(shift);
                moved
            }
            Key::ArrowRight if word => {
                self.move_word_right(shift);
                moved
            }
            Key::ArrowRight => {
                self.move_right(shift);
                moved
            }
            Key::ArrowUp if !rules.single_line => {
                self.move_line(true, shift);
                moved
            }
            Key::ArrowDown if !rules.single_line => {
                self.move_line(false, shift);
                moved
            }
            Key::Home => {
                self.move_home(shift);
                moved
            }
            Key::End => {
                self.move_end(shift);
                moved
            }
            Key::A if modifiers.ctrl || modifiers.meta => {
                self.select_all();
                moved
            }
            _ => EditOutcome::default(),
        }
    }

    // ── measurement ───────────────────────────────────────────────────────

    /// Closest caret byte offset to `x` on `line`, with `advance` measuring a
    /// single line of text.
    pub fn x_to_cursor(&self, line: usize, x: f32, advance: impl Fn(&str) -> f32) -> usize {
        let Some((start, content)) = line_span(&self.text, line) else {
            return self.text.len();
        };
        let mut best = (0, f32::INFINITY);
        let mut i = 0;
        loop {
            let dist = (advance(&content[..i]) - x).abs();
            if dist < best.1 {
                best = (i, dist);
            }
            if i >= content.len() {
                break;
            }
            i = next_char(content, i);
        }
        start + best.0
    }

    /// Moves the caret to a byte offset, keeping the anchor when extending.
    pub fn place_cursor(&mut self, byte: usize, extend: bool) {
        let mut b = byte.min(self.text.len());
        while !self.text.is_char_boundary(b) {
            b -= 1;
        }
        self.cursor = b;
        if !extend {
            self.anchor = b;
        }
    }

    /// Keeps the caret inside `[0, width]` after horizontal scrolling.
    pub fn ensure_cursor_visible(&mut self, width: f32, advance: impl Fn(&str) -> f32) {
        let line_start = self.text[..self.cursor].rfind('\n').map_or(0, |i| i + 1);
        let cx = advance(&self.text[line_start..self.cursor]);
        if cx < self.scroll_offset {
            self.scroll_offset = cx;
        } else if cx > self.scroll_offset + width {
            self.scroll_offset = cx - width;
        }
        self.scroll_offset = self.scroll_offset.max(0.0);
    }
}

// ── UTF-8 helpers ─────────────────────────────────────────────────────────

fn char_index(s: &str, byte: usize) -> usize {
    s[..byte.min(s.len())].chars().count()
}

fn byte_index(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map_or(s.len(), |(i, _)| i)
}

/// Byte offset and content of zero-based `line`.
fn line_span(s: &str, line: usize) -> Option<(usize, &str)> {
    let mut start = 0;
    for (i, content) in s.split('\n').enumerate() {
        if i == line {
            return Some((start, content));
        }
        start += content.len() + 1;
    }
    None
}

fn prev_char(s: &str, from: usize) -> usize {
    if from == 0 {
        return 0;
    }
    let mut i = from - 1;
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn next_char(s: &str, from: usize) -> usize {
    if from >= s.len() {
        return s.len();
    }
    let mut i = from + 1;
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// Back over whitespace, then over the word before it.
fn prev_word(s: &str, from: usize) -> usize {
    let trimmed = s[..from].trim_end();
    trimmed.trim_end_matches(|c: char| !c.is_whitespace()).len()
}

/// Over the rest of the current word, then over the whitespace after it.
fn next_word(s: &str, from: usize) -> usize {
    let after = &s[from..];
    let rest = after.trim_start_matches(|c: char| !c.is_whitespace()).trim_start();
    from + (after.len() - rest.len())
}
