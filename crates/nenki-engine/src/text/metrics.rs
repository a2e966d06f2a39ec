use crate::coords::Vec2;

/// Size queries for laid-out text.
pub trait TextMetrics {
    /// Bounding size of `text` at font `size`, wrapped at `max_width` if given.
    fn measure(&self, text: &str, size: f32, line_height: f32, max_width: Option<f32>) -> Vec2;

    /// Horizontal advance of a single line. Used for caret placement.
    fn advance(&self, text: &str, size: f32) -> f32;
}

/// Fixed-advance estimator: every char is `advance_em × size` wide.
#[derive(Debug, Clone, Copy)]
pub struct ApproxMetrics {
    pub advance_em: f32,
}

impl Default for ApproxMetrics {
    fn default() -> Self {
        Self { advance_em: 0.5 }
    }
}

impl TextMetrics for ApproxMetrics {
    fn measure(&self, text: &str, size: f32, line_height: f32, max_width: Option<f32>) -> Vec2 {
        let glyph = (self.advance_em * size).max(f32::EPSILON);
        let per_line = max_width
            .filter(|w| w.is_finite())
            .map(|w| ((w / glyph).floor() as usize).max(1));

        let mut lines = 0usize;
        let mut widest = 0usize;
        for line in text.split('\n') {
            let chars = line.chars().count();
            match per_line {
                Some(n) if chars > n => {
                    lines += chars.div_ceil(n);
                    widest = widest.max(n);
                }
                _ => {
                    lines += 1;
                    widest = widest.max(chars);
                }
            }
        }
        Vec2::new(widest as f32 * glyph, lines as f32 * line_height)
    }

    fn advance(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * self.advance_em * size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_width_scales_with_chars() {
        let m = ApproxMetrics::default();
        assert_eq!(m.measure("abcd", 10.0, 12.0, None), Vec2::new(20.0, 12.0));
    }

    #[test]
    fn wraps_at_max_width() {
        let m = ApproxMetrics::default();
        // 5 dp per glyph, 10 glyphs in 20 dp → 4 per line → 3 lines.
        let s = m.measure("abcdefghij", 10.0, 12.0, Some(20.0));
        assert_eq!(s, Vec2::new(20.0, 36.0));
    }

    #[test]
    fn explicit_newlines_count_as_lines() {
        let m = ApproxMetrics::default();
        assert_eq!(m.measure("ab\nc", 10.0, 10.0, None).y, 20.0);
    }

    #[test]
    fn empty_text_is_one_line_tall() {
        let m = ApproxMetrics::default();
        assert_eq!(m.measure("", 10.0, 14.0, None), Vec2::new(0.0, 14.0));
    }
}
