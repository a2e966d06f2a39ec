//! Nenki engine crate.
//!
//! Renderer-agnostic pieces shared by the widget tree and whatever platform
//! drives it: geometry, colors, the per-frame draw stream, input, timing,
//! text measurement and the platform contract.

pub mod coords;
pub mod input;
pub mod logging;
pub mod paint;
pub mod platform;
pub mod scene;
pub mod text;
pub mod time;
