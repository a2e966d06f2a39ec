//! Frame timing.
//!
//! One `FrameClock` per loop; call `tick_at()` with the platform's frame
//! timestamp to obtain a `FrameTime`.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
