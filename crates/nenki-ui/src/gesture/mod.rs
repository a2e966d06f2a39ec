//! Interaction primitives widgets build on.
//!
//! They consume the [`UiEvent`](crate::event::UiEvent)s a widget drained
//! this frame and turn them into edges (clicked, changed) the widget maps
//! onto its callbacks.

mod clickable;
mod long_click;
mod text_edit;

pub use clickable::{ClickEdge, Clickable, Press};
pub use long_click::{ClickDisambiguator, Gesture};
pub use text_edit::{EditOutcome, EditRules, TextEditState};
