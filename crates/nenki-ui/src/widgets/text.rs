use nenki_engine::paint::Color;

/// Horizontal placement of text inside its box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    #[default]
    Start,
    End,
    Middle,
}

impl Alignment {
    /// Offset of a `content`-wide run inside `width`.
    pub fn offset(self, width: f32, content: f32) -> f32 {
        let free = (width - content).max(0.0);
        match self {
            Alignment::Start => 0.0,
            Alignment::End => free,
            Alignment::Middle => free / 2.0,
        }
    }
}

/// Where long lines may break.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WrapPolicy {
    #[default]
    Heuristically,
    Words,
    Graphemes,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Weight {
    Thin,
    ExtraLight,
    Light,
    #[default]
    Normal,
    Medium,
    SemiBold,
    Bold,
    ExtraBold,
    Black,
}

impl Weight {
    /// CSS-style numeric weight.
    pub fn value(self) -> u16 {
        match self {
            Weight::Thin => 100,
            Weight::ExtraLight => 200,
            Weight::Light => 300,
            Weight::Normal => 400,
            Weight::Medium => 500,
            Weight::SemiBold => 600,
            Weight::Bold => 700,
            Weight::ExtraBold => 800,
            Weight::Black => 900,
        }
    }
}

/// Keyboard layout an editor asks the platform for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum InputHint {
    #[default]
    Any,
    Text,
    Numeric,
    Email,
    Url,
    Telephone,
    Password,
}

/// Font parameters shared by every text-bearing widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub color: Color,
    pub weight: Weight,
    /// Absolute line height; `None` derives it from `line_height_scale`.
    pub line_height: Option<f32>,
    pub line_height_scale: f32,
}

impl TextStyle {
    pub fn new(size: f32, color: Color) -> Self {
        Self { size, color, ..Self::default() }
    }

    #[inline]
    pub fn line_height(&self) -> f32 {
        self.line_height.unwrap_or(self.size * self.line_height_scale)
    }

    /// Distance from the bottom of a line box to its baseline, assuming
    /// glyphs centred in the line with a 0.8 em ascent.
    pub fn baseline_from_bottom(&self) -> f32 {
        let lh = self.line_height();
        (lh - (lh - self.size) / 2.0 - self.size * 0.8).max(0.0)
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 14.0,
            color: Color::BLACK,
            weight: Weight::Normal,
            line_height: None,
            line_height_scale: 1.2,
        }
    }
}
