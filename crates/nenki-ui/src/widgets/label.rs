use nenki_engine::coords::Vec2;
use nenki_engine::paint::Color;

use crate::context::LayoutCx;
use crate::widget::{Dimensions, Widget};

use super::text::{Alignment, TextStyle, Weight, WrapPolicy};

/// Read-only text.
///
/// Wraps at the available width. With `max_lines` set, overflowing text is
/// cut and ends with the truncator.
pub struct Label {
    text: String,
    style: TextStyle,
    alignment: Alignment,
    max_lines: usize,
    truncator: String,
    wrap: WrapPolicy,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
            alignment: Alignment::Start,
            max_lines: 0,
            truncator: "…".to_string(),
            wrap: WrapPolicy::default(),
        }
    }

    pub fn with_style(mut self, style: TextStyle) -> Self { self.style = style; self }

    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self { self.text = text.into(); self }
    pub fn set_font_size(&mut self, size: f32) -> &mut Self { self.style.size = size; self }
    pub fn set_color(&mut self, color: Color) -> &mut Self { self.style.color = color; self }
    pub fn set_alignment(&mut self, alignment: Alignment) -> &mut Self { self.alignment = alignment; self }
    pub fn set_line_height(&mut self, height: f32) -> &mut Self { self.style.line_height = Some(height); self }
    pub fn set_line_height_scale(&mut self, scale: f32) -> &mut Self { self.style.line_height_scale = scale; self }
    /// 0 means unlimited.
    pub fn set_max_lines(&mut self, lines: usize) -> &mut Self { self.max_lines = lines; self }
    pub fn set_truncator(&mut self, truncator: impl Into<String>) -> &mut Self { self.truncator = truncator.into(); self }
    pub fn set_wrap_policy(&mut self, wrap: WrapPolicy) -> &mut Self { self.wrap = wrap; self }
    pub fn set_weight(&mut self, weight: Weight) -> &mut Self { self.style.weight = weight; self }

    pub fn text(&self) -> &str { &self.text }
    pub fn font_size(&self) -> f32 { self.style.size }
    pub fn color(&self) -> Color { self.style.color }
    pub fn alignment(&self) -> Alignment { self.alignment }
    pub fn max_lines(&self) -> usize { self.max_lines }
    pub fn truncator(&self) -> &str { &self.truncator }
    pub fn wrap_policy(&self) -> WrapPolicy { self.wrap }
    pub fn weight(&self) -> Weight { self.style.weight }
    pub fn style(&self) -> &TextStyle { &self.style }

    /// Longest prefix that, with the truncator appended, fits `limit` height.
    fn truncated(&self, cx: &LayoutCx<'_>, max_width: Option<f32>, limit: f32) -> String {
        let chars: Vec<char> = self.text.chars().collect();
        let fits = |n: usize| {
            let candidate: String = chars[..n].iter().collect::<String>() + &self.truncator;
            cx.measure_text(&candidate, &self.style, max_width).y <= limit + 0.01
        };
        let (mut lo, mut hi) = (0, chars.len());
        while lo < hi {
            let mid = (lo + hi).div_ceil(2);
            if fits(mid) {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        chars[..lo].iter().collect::<String>() + &self.truncator
    }
}

impl Widget for Label {
    fn layout(&mut self, cx: &mut LayoutCx<'_>) -> Dimensions {
        let max_width = Some(cx.constraints.max.x).filter(|w| w.is_finite());
        let mut measured = cx.measure_text(&self.text, &self.style, max_width);

        let limit = self.max_lines as f32 * self.style.line_height();
        let shown = if self.max_lines > 0 && measured.y > limit + 0.01 {
            let cut = self.truncated(cx, max_width, limit);
            measured = cx.measure_text(&cut, &self.style, max_width);
            Some(cut)
        } else {
            None
        };
        let text = shown.as_deref().unwrap_or(&self.text);

        let size = cx.constraints.constrain(measured);
        let origin = Vec2::new(self.alignment.offset(size.x, measured.x), 0.0);
        let style = self.style;
        cx.painter().text(text, origin, &style, max_width);

        Dimensions { size, baseline: style.baseline_from_bottom() }
    }
}

#[cfg(test)]
mod tests {
    use nenki_engine::scene::DrawCmd;

    use super::*;
    use crate::constraints::Constraints;
    use crate::context::testing::Harness;

    fn drawn_text(h: &Harness) -> Vec<(String, Vec2)> {
        h.scene
            .items()
            .iter()
            .filter_map(|i| match &i.cmd {
                DrawCmd::Text(t) => Some((t.text.clone(), t.origin)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn wraps_at_available_width() {
        let mut h = Harness::new();
        let label = h.tree.insert(Label::new("abcdefghij"));
        // 7 dp glyphs, 35 dp wide → 5 per line → 2 lines.
        let dims = h.layout(label, Constraints::loose(Vec2::new(35.0, 500.0)));
        assert_eq!(dims.size.x, 35.0);
        assert!((dims.size.y - 2.0 * 14.0 * 1.2).abs() < 1e-3);
    }

    #[test]
    fn max_lines_truncates_with_truncator() {
        let mut h = Harness::new();
        let label = h.tree.insert(Label::new("abcdefghij"));
        {
            let mut w = h.tree.get_mut(label).unwrap();
            w.set_max_lines(1).set_truncator("~");
        }
        h.layout(label, Constraints::loose(Vec2::new(35.0, 500.0)));
        assert_eq!(drawn_text(&h), vec![("abcd~".to_string(), Vec2::ZERO)]);
    }

    #[test]
    fn alignment_moves_text_inside_min_width() {
        let mut h = Harness::new();
        let label = h.tree.insert(Label::new("ab"));
        h.tree.get_mut(label).unwrap().set_alignment(Alignment::End);
        h.layout(label, Constraints::tight(Vec2::new(100.0, 20.0)));
        assert_eq!(drawn_text(&h)[0].1, Vec2::new(86.0, 0.0));
    }
}
