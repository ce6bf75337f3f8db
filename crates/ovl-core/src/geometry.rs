#![forbid(unsafe_code)]

//! Geometric primitives in percentage-of-viewport space.
//!
//! Coordinates run from `0.0` to `100.0` on both axes with the origin at the
//! top-left. All bounds are closed: an edge counts as inside.

/// A position in percentage coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A closed numeric interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    #[inline]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// True when `min > max` or either bound is NaN.
    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.min.is_nan() || self.max.is_nan() || self.min > self.max
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

/// A rectangular region where no placement may be centered.
///
/// Zones are reserved for overlaid text such as a heading or subtitle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Zone {
    /// Left edge (inclusive).
    pub left: f64,
    /// Top edge (inclusive).
    pub top: f64,
    /// Right edge (inclusive).
    pub right: f64,
    /// Bottom edge (inclusive).
    pub bottom: f64,
}

impl Zone {
    #[inline]
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Build a zone from its horizontal and vertical extents.
    #[inline]
    pub const fn from_spans(x: Span, y: Span) -> Self {
        Self::new(x.min, y.min, x.max, y.max)
    }

    #[inline]
    pub fn horizontal(&self) -> Span {
        Span::new(self.left, self.right)
    }

    #[inline]
    pub fn vertical(&self) -> Span {
        Span::new(self.top, self.bottom)
    }

    /// Check if a point lies inside the zone, edges included.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        self.horizontal().contains(point.x) && self.vertical().contains(point.y)
    }
}
