//! Scrollbar drawn by [`ListLayout`](super::list::ListLayout).
//!
//! The thumb is placed from the list's [`Position`] only. Item extents
//! outside the visible window are unknown, so the content length is an
//! estimate (average visible extent times item count) and the thumb can
//! drift slightly when items differ a lot in size.

use nenki_engine::coords::{Rect, Vec2};
use nenki_engine::paint::Color;

use crate::constraints::Axis;
use crate::context::LayoutCx;
use crate::event::UiEvent;

use super::list::Position;

/// Hit part of the track.
pub(crate) const PART_TRACK: u32 = 1;
/// Hit part of the thumb.
pub(crate) const PART_INDICATOR: u32 = 2;

/// How the bar shares space with list content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnchorStrategy {
    /// The bar reserves its width beside the content.
    #[default]
    Occupy,
    /// The bar floats over the content.
    Overlay,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollbarStyle {
    pub track_color: Color,
    /// Track padding across the bar.
    pub minor_padding: f32,
    /// Track padding along the bar.
    pub major_padding: f32,
    /// Thumb thickness.
    pub width: f32,
    /// Shortest thumb length.
    pub min_length: f32,
    pub corner_radius: f32,
    pub color: Color,
    pub hover_color: Color,
    pub anchor: AnchorStrategy,
}

impl Default for ScrollbarStyle {
    fn default() -> Self {
        Self {
            track_color: Color::TRANSPARENT,
            minor_padding: 2.0,
            major_padding: 2.0,
            width: 10.0,
            min_length: 16.0,
            corner_radius: 5.0,
            color: Color::from_srgb_u8(0, 0, 0, 150),
            hover_color: Color::from_srgb_u8(0, 0, 0, 200),
            anchor: AnchorStrategy::Occupy,
        }
    }
}

impl ScrollbarStyle {
    /// Thickness of the whole bar, padding included.
    #[inline]
    pub fn thickness(&self) -> f32 {
        self.width + 2.0 * self.minor_padding
    }
}

/// Visible window of a list as `(start, end)` fractions of its content.
///
/// The estimate from item indices and the one from the viewport size can
/// disagree when items vary in size. The difference is spread over both
/// ends, each taking the share of how far it already is from its extreme,
/// so the thumb does not jump as items scroll in and out.
pub fn from_list_position(pos: &Position, items: usize, major: f32) -> (f32, f32) {
    if items == 0 || pos.length <= 0.0 {
        return (0.0, 1.0);
    }
    let length = pos.length;
    let item = length / items as f32;

    let start = ((pos.first as f32 * item + pos.offset) / length).clamp(0.0, 1.0);
    let end = (((pos.first + pos.count) as f32 * item + pos.offset_last) / length).clamp(0.0, 1.0);
    let shown = end - start;
    let expected = major / length;

    let err = expected - shown;
    let (mut adj_start, mut adj_end) = (start, end);
    if shown < 1.0 {
        adj_start -= start / (1.0 - shown) * err;
        adj_end += (1.0 - end) / (1.0 - shown) * err;
    }
    (adj_start.clamp(0.0, 1.0), adj_end.clamp(0.0, 1.0))
}

/// `true` if the window does not show everything.
#[inline]
pub(crate) fn is_scrollable(start: f32, end: f32) -> bool {
    end - start < 1.0
}

/// Pointer state of the bar between frames.
#[derive(Debug, Default)]
pub(crate) struct Scrollbar {
    dragging: bool,
    last_main: f32,
    /// Track length seen last frame; input is measured against it.
    track_len: f32,
    window: (f32, f32),
}

impl Scrollbar {
    pub(crate) fn dragging(&self) -> bool {
        self.dragging
    }

    /// Turns bar events into a scroll distance as a fraction of content.
    ///
    /// Pressing the track centres the window on the press; dragging moves
    /// it by the pointer distance.
    pub(crate) fn handle(&mut self, events: &[UiEvent], axis: Axis) -> f32 {
        if self.track_len <= 0.0 {
            self.dragging = false;
            return 0.0;
        }
        let mut delta = 0.0;
        for ev in events {
            match *ev {
                UiEvent::Press { pos, part: PART_TRACK, .. } => {
                    let at = axis.main(pos) / self.track_len;
                    let (start, end) = self.window;
                    delta += at - (start + end) / 2.0;
                    self.dragging = true;
                    self.last_main = axis.main(pos);
                }
                UiEvent::Press { pos, part: PART_INDICATOR, .. } => {
                    self.dragging = true;
                    self.last_main = axis.main(pos);
                }
                UiEvent::Drag { pos, part } if self.dragging && (part == PART_TRACK || part == PART_INDICATOR) => {
                    let main = axis.main(pos);
                    delta += (main - self.last_main) / self.track_len;
                    self.last_main = main;
                }
                UiEvent::Release { .. } | UiEvent::Cancel => self.dragging = false,
                _ => {}
            }
        }
        delta
    }

    /// Draws track and thumb into `bar` and registers both hit parts.
    ///
    /// Draws nothing and forgets its geometry when everything is visible.
    pub(crate) fn paint(
        &mut self,
        cx: &mut LayoutCx<'_>,
        style: &ScrollbarStyle,
        axis: Axis,
        bar: Rect,
        window: (f32, f32),
    ) {
        let (start, end) = window;
        if !is_scrollable(start, end) {
            self.track_len = 0.0;
            self.dragging = false;
            return;
        }

        let major = axis.main(bar.size) - 2.0 * style.major_padding;
        let track_len = major.max(0.0);
        let mut view_start = (start * track_len).round();
        let view_end = (end * track_len).round();
        let len = (view_end - view_start).max(style.min_length).min(track_len);
        if view_start + len > track_len {
            view_start = track_len - len;
        }
        self.track_len = track_len;
        self.window = window;

        let thumb = Rect::from_origin_size(
            bar.origin + axis.pack(style.major_padding + view_start, style.minor_padding),
            axis.pack(len, style.width),
        );
        let hovered = self.dragging || cx.hovered_part() == Some(PART_INDICATOR);
        let color = if hovered { style.hover_color } else { style.color };

        {
            let mut p = cx.overlay_painter();
            p.fill_rect(bar, style.track_color);
            p.fill_rounded_rect(thumb, style.corner_radius, color, None);
        }

        // Track events are measured from where the thumb could start.
        let track = Rect::from_origin_size(
            bar.origin + axis.pack(style.major_padding, 0.0),
            axis.pack(track_len, axis.cross(bar.size)),
        );
        cx.register_hit(track, PART_TRACK);
        cx.register_hit(thumb, PART_INDICATOR);
    }
}
