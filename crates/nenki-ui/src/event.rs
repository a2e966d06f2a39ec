use nenki_engine::coords::Vec2;
use nenki_engine::input::{Key, Modifiers};

/// Input routed to one widget for the current frame.
///
/// Pointer positions are relative to the top-left corner of the hit area
/// that received the event, in dp.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Primary button went down over the widget. The widget now holds the
    /// pointer capture until the matching release.
    Press { pos: Vec2, part: u32, modifiers: Modifiers },
    /// Pointer moved while the widget holds the capture.
    Drag { pos: Vec2, part: u32 },
    /// Primary button went up. `inside` is whether the pointer is still over
    /// the pressed area.
    Release { pos: Vec2, part: u32, inside: bool },
    /// Capture lost without a release (window lost focus).
    Cancel,
    /// Wheel or touchpad scroll. Positive `y` moves toward the end.
    Scroll { delta: Vec2, part: u32 },
    Key { key: Key, modifiers: Modifiers },
    Text(String),
    FocusGained,
    FocusLost,
}

impl UiEvent {
    /// Hit-area part the event refers to, for pointer events.
    pub fn part(&self) -> Option<u32> {
        match self {
            UiEvent::Press { part, .. }
            | UiEvent::Drag { part, .. }
            | UiEvent::Release { part, .. }
            | UiEvent::Scroll { part, .. } => Some(*part),
            _ => None,
        }
    }

    pub fn is_focus_change(&self) -> bool {
        matches!(self, UiEvent::FocusGained | UiEvent::FocusLost)
    }
}
