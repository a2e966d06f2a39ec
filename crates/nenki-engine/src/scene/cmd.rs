use crate::coords::Vec2;
use crate::scene::shapes::circle::CircleCmd;
use crate::scene::shapes::rect::RectCmd;
use crate::scene::shapes::rounded_rect::RoundedRectCmd;
use crate::scene::shapes::text::TextCmd;

/// Renderer-agnostic draw command stream.
///
/// Extending the scene:
/// - add a new shape module under `scene::shapes::*`
/// - add a new variant here and teach [`DrawCmd::translate`] about it
/// - implement push helpers inside that shape module
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect(RectCmd),
    RoundedRect(RoundedRectCmd),
    Circle(CircleCmd),
    Text(TextCmd),
}

impl DrawCmd {
    /// Moves the command's geometry by `by`.
    pub fn translate(&mut self, by: Vec2) {
        match self {
            DrawCmd::Rect(c) => c.rect = c.rect.translate(by),
            DrawCmd::RoundedRect(c) => c.rect = c.rect.translate(by),
            DrawCmd::Circle(c) => c.center += by,
            DrawCmd::Text(c) => c.origin += by,
        }
    }
}
