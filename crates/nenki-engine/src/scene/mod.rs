//! Frame draw stream.
//!
//! Responsibilities:
//! - store renderer-agnostic draw commands and pointer hit areas
//! - provide deterministic ordering (z-index, then recording order)
//! - let a parent reposition whatever a child recorded, after the fact
//! - keep shape-specific helpers isolated per shape file under `scene::shapes`

mod cmd;
mod hit;
mod list;
mod z_index;

pub mod shapes;

pub use cmd::DrawCmd;
pub use hit::{HitArea, HitTag};
pub use list::{DrawItem, DrawList, Mark, Recording};
pub use shapes::Border;
pub use shapes::circle::CircleCmd;
pub use shapes::rect::RectCmd;
pub use shapes::rounded_rect::RoundedRectCmd;
pub use shapes::text::TextCmd;
pub use z_index::ZIndex;
