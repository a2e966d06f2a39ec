//! Platform-agnostic input.
//!
//! Platforms translate their native events into [`InputEvent`]s, fold them
//! into an [`InputState`] and hand the frame's batch to the UI as an
//! [`InputFrame`].

mod frame;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{
    InputEvent,
    Key,
    KeyState,
    Modifiers,
    MouseButton,
    MouseButtonState,
    MouseWheelDelta,
    PointerButtonEvent,
    PointerMoveEvent,
    TextEvent,
};
