//! Geometry shared by the draw stream and the widget tree.
//!
//! All values are device-independent units (dp):
//! - origin top-left
//! - +X right, +Y down
//!
//! Conversion to physical pixels happens at the platform boundary using the
//! frame's scale factor.

mod corner_radii;
mod rect;
mod vec2;
mod viewport;

pub use corner_radii::CornerRadii;
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
