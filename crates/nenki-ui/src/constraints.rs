use nenki_engine::coords::{Rect, Vec2};

// ── Edges ─────────────────────────────────────────────────────────────────

/// Insets on all four sides (margin, padding, border spacer).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Edges {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Edges {
    /// Argument order follows the widget `margin`/`padding` setters.
    #[inline]
    pub fn new(top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self { top, right, bottom, left }.non_negative()
    }

    #[inline]
    pub fn all(v: f32) -> Self {
        Self::new(v, v, v, v)
    }

    #[inline]
    pub fn symmetric(vertical: f32, horizontal: f32) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }

    /// Total inset on the horizontal axis.
    #[inline]
    pub fn h(self) -> f32 {
        self.left + self.right
    }

    /// Total inset on the vertical axis.
    #[inline]
    pub fn v(self) -> f32 {
        self.top + self.bottom
    }

    #[inline]
    pub fn size(self) -> Vec2 {
        Vec2::new(self.h(), self.v())
    }

    #[inline]
    pub fn top_left(self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    #[inline]
    #[must_use]
    pub fn non_negative(self) -> Self {
        Self {
            top: self.top.max(0.0),
            right: self.right.max(0.0),
            bottom: self.bottom.max(0.0),
            left: self.left.max(0.0),
        }
    }
}

impl std::ops::Add for Edges {
    type Output = Edges;
    fn add(self, rhs: Edges) -> Edges {
        Edges {
            top: self.top + rhs.top,
            right: self.right + rhs.right,
            bottom: self.bottom + rhs.bottom,
            left: self.left + rhs.left,
        }
    }
}

// ── Axis ──────────────────────────────────────────────────────────────────

/// Layout direction of rows, columns, lists and sliders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Axis {
    #[default]
    Horizontal,
    Vertical,
}

impl Axis {
    /// Component of `v` along this axis.
    #[inline]
    pub fn main(self, v: Vec2) -> f32 {
        match self {
            Axis::Horizontal => v.x,
            Axis::Vertical => v.y,
        }
    }

    /// Component of `v` across this axis.
    #[inline]
    pub fn cross(self, v: Vec2) -> f32 {
        match self {
            Axis::Horizontal => v.y,
            Axis::Vertical => v.x,
        }
    }

    /// Builds a vector from main and cross components.
    #[inline]
    pub fn pack(self, main: f32, cross: f32) -> Vec2 {
        match self {
            Axis::Horizontal => Vec2::new(main, cross),
            Axis::Vertical => Vec2::new(cross, main),
        }
    }

    /// Constraints from main and cross ranges.
    #[inline]
    pub fn constraints(self, main_min: f32, main_max: f32, cross_min: f32, cross_max: f32) -> Constraints {
        Constraints {
            min: self.pack(main_min, cross_min),
            max: self.pack(main_max, cross_max),
        }
    }
}

// ── Constraints ───────────────────────────────────────────────────────────

/// Size range a parent hands to a child for one layout call.
///
/// A child may return any size in `[min, max]`; `max` components may be
/// infinite along a scrolling axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraints {
    pub min: Vec2,
    pub max: Vec2,
}

impl Constraints {
    /// Tight: child must be exactly `size`.
    #[inline]
    pub fn tight(size: Vec2) -> Self {
        Self { min: size, max: size }
    }

    /// Loose: child can be anywhere from zero up to `max`.
    #[inline]
    pub fn loose(max: Vec2) -> Self {
        Self { min: Vec2::ZERO, max }
    }

    #[inline]
    pub fn unbounded() -> Self {
        Self { min: Vec2::ZERO, max: Vec2::INFINITY }
    }

    /// Clamp a size into `[min, max]`.
    #[inline]
    #[must_use]
    pub fn constrain(self, size: Vec2) -> Vec2 {
        Vec2::new(
            size.x.max(self.min.x).min(self.max.x),
            size.y.max(self.min.y).min(self.max.y),
        )
    }

    /// Shrinks both bounds by `edges`, never below zero.
    ///
    /// Used for margins and padding: the child sees the space left inside
    /// the insets and whatever minimum remains after them.
    #[inline]
    #[must_use]
    pub fn inset(self, edges: Edges) -> Self {
        let max = Vec2::new(
            (self.max.x - edges.h()).max(0.0),
            (self.max.y - edges.v()).max(0.0),
        );
        let min = Vec2::new(
            (self.min.x - edges.h()).max(0.0).min(max.x),
            (self.min.y - edges.v()).max(0.0).min(max.y),
        );
        Self { min, max }
    }

    /// Same maximum, no minimum.
    #[inline]
    #[must_use]
    pub fn loosen(self) -> Self {
        Self { min: Vec2::ZERO, max: self.max }
    }
}

// ── rect helper ──────────────────────────────────────────────────────────

/// Shrink a rect by `edges`.
#[inline]
pub fn inset_rect(rect: Rect, edges: Edges) -> Rect {
    Rect::new(
        rect.origin.x + edges.left,
        rect.origin.y + edges.top,
        (rect.size.x - edges.h()).max(0.0),
        (rect.size.y - edges.v()).max(0.0),
    )
}
