use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList, ZIndex};

/// Text draw payload. Shaping and rasterisation belong to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCmd {
    pub text: String,
    /// Font size in dp.
    pub size: f32,
    pub color: Color,
    /// Top-left of the text block.
    pub origin: Vec2,
    /// Wrapping width. `None` = no wrapping.
    pub max_width: Option<f32>,
    /// Distance between baselines in dp.
    pub line_height: f32,
    /// CSS-style weight, 100..=900.
    pub weight: u16,
}

impl DrawList {
    /// Records a text draw command.
    pub fn push_text(&mut self, z: ZIndex, cmd: TextCmd) {
        self.push(z, DrawCmd::Text(cmd));
    }
}
