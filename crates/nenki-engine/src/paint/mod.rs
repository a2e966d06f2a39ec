//! Color model shared between widgets and renderers.

pub mod color;

pub use color::Color;
