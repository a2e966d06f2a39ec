use std::collections::VecDeque;
use std::time::{Duration, Instant};

use nenki_engine::coords::Vec2;

use crate::event::UiEvent;

const HISTORY: usize = 8;

/// One press, from button down to up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Press {
    pub position: Vec2,
    pub start: Instant,
    /// `None` while still held.
    pub end: Option<Instant>,
    pub cancelled: bool,
}

/// Edge produced by [`Clickable::handle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickEdge {
    Press,
    /// Released over the widget.
    Click,
    /// Released elsewhere, or capture lost.
    Cancel,
}

/// Press/click state machine over routed pointer events.
#[derive(Debug, Clone, Default)]
pub struct Clickable {
    history: VecDeque<Press>,
    pressed: bool,
    hovered: bool,
    focused: bool,
}

impl Clickable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes this frame's events and returns the edges they produced.
    /// `part` restricts pointer events to one hit region.
    pub fn handle(&mut self, events: &[UiEvent], part: Option<u32>, now: Instant) -> Vec<ClickEdge> {
        let mut edges = Vec::new();
        for ev in events {
            if matches!((part, ev.part()), (Some(want), Some(got)) if want != got) {
                continue;
            }
            match ev {
                UiEvent::Press { pos, .. } => {
                    self.pressed = true;
                    if self.history.len() == HISTORY {
                        self.history.pop_front();
                    }
                    self.history.push_back(Press { position: *pos, start: now, end: None, cancelled: false });
                    edges.push(ClickEdge::Press);
                }
                UiEvent::Release { inside, .. } if self.pressed => {
                    self.pressed = false;
                    let cancelled = !inside;
                    if let Some(last) = self.history.back_mut() {
                        last.end = Some(now);
                        last.cancelled = cancelled;
                    }
                    edges.push(if cancelled { ClickEdge::Cancel } else { ClickEdge::Click });
                }
                UiEvent::Cancel if self.pressed => {
                    self.pressed = false;
                    if let Some(last) = self.history.back_mut() {
                        last.end = Some(now);
                        last.cancelled = true;
                    }
                    edges.push(ClickEdge::Cancel);
                }
                UiEvent::FocusGained => self.focused = true,
                UiEvent::FocusLost => self.focused = false,
                _ => {}
            }
        }
        edges
    }

    /// Returns `true` when the hover state flipped to hovered.
    pub fn set_hovered(&mut self, hovered: bool) -> bool {
        let entered = hovered && !self.hovered;
        self.hovered = hovered;
        entered
    }

    #[inline]
    pub fn hovered(&self) -> bool {
        self.hovered
    }

    #[inline]
    pub fn pressed(&self) -> bool {
        self.pressed
    }

    #[inline]
    pub fn focused(&self) -> bool {
        self.focused
    }

    /// Recent presses, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &Press> {
        self.history.iter()
    }

    /// Gap between the end of the previous completed press and the start of
    /// the latest one. `None` with fewer than two completed presses.
    pub fn last_interval(&self) -> Option<Duration> {
        let mut done = self.history.iter().rev().filter(|p| p.end.is_some() && !p.cancelled);
        let last = done.next()?;
        let prev = done.next()?;
        Some(last.start.saturating_duration_since(prev.end?))
    }
}
