use std::any::Any;

use nenki_engine::coords::Vec2;

use crate::context::LayoutCx;

// ── Dimensions ────────────────────────────────────────────────────────────

/// Result of laying out a widget.
///
/// The zero value means "destroyed, hidden or empty" to the parent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Dimensions {
    pub size: Vec2,
    /// Distance from the bottom edge to the text baseline.
    pub baseline: f32,
}

impl Dimensions {
    pub const ZERO: Dimensions = Dimensions { size: Vec2::ZERO, baseline: 0.0 };

    #[inline]
    pub fn new(size: Vec2) -> Self {
        Self { size, baseline: 0.0 }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.size == Vec2::ZERO
    }
}

// ── Widget trait ──────────────────────────────────────────────────────────

/// How many children a widget accepts through the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildCapacity {
    /// Leaf widget.
    None,
    /// Attaching a new child detaches the previous one.
    One,
    /// Ordered children with sizing policies.
    Many,
}

/// Upcast helper so trees can hand back concrete widget types.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The contract every node in the tree implements.
///
/// A widget lays itself out in its own local space: `(0, 0)` is its
/// top-left corner after margins. It records drawing and hit areas through
/// `cx` and returns the size it occupies. Containers lay children out with
/// [`LayoutCx::layout_child`] and then move them into place, or hold a
/// child's output with [`LayoutCx::layout_child_detached`] until they know
/// where, or whether, it goes.
///
/// Destruction, soft hiding and margins are handled by the tree, so
/// implementations never see a destroyed child and never apply their own
/// margin.
///
/// # Implementing a custom widget
///
/// ```rust,ignore
/// use nenki_ui::prelude::*;
///
/// pub struct Swatch { color: Color, side: f32 }
///
/// impl Widget for Swatch {
///     fn layout(&mut self, cx: &mut LayoutCx<'_>) -> Dimensions {
///         let size = cx.constraints.constrain(Vec2::splat(self.side));
///         cx.painter().fill_rect(Rect::from_size(size), self.color);
///         Dimensions::new(size)
///     }
/// }
/// ```
pub trait Widget: AsAny {
    /// Measure, record drawing for this frame and react to routed input.
    ///
    /// Called at most once per widget per frame.
    fn layout(&mut self, cx: &mut LayoutCx<'_>) -> Dimensions;

    fn capacity(&self) -> ChildCapacity {
        ChildCapacity::None
    }
}
