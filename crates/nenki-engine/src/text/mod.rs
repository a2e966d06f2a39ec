//! Text measurement seam.
//!
//! Shaping lives with the renderer. Widgets only need sizes, so they talk to
//! a [`TextMetrics`] implementation the platform provides; [`ApproxMetrics`]
//! is a fixed-advance estimator used when nothing better is available.

mod metrics;

pub use metrics::{ApproxMetrics, TextMetrics};
