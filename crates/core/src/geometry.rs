//! Geometric primitives for page-pixel rectangles.
//!
//! Provides:
//! - `Rect`: axis-aligned rectangle with top-left origin
//! - `adjacent()`: row/column adjacency heuristic used by the block merger
//! - `union()`: smallest rectangle covering two rectangles
//! - `contains()`: full containment test used for nested de-duplication

use serde::{Deserialize, Serialize};

/// Default tolerance for center alignment, in pixels.
pub const DEFAULT_ALIGN_TOLERANCE: f64 = 8.0;

/// Default tolerance for edge adjacency, in pixels.
pub const DEFAULT_ADJ_TOLERANCE: f64 = 4.0;

/// A rectangle in page pixels, origin at the top-left corner of the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Returns true when the rectangle has no area.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Returns true if `a` and `b` look like parts of the same visual component.
///
/// Two layouts qualify:
/// ```text
///   same text line, side by side         stacked column
///   +-----+ +-----+  - -                 +-------+
///   |  a  | |  b  |   | (align)          |   a   |
///   +-----+ +-----+  - -                 +-------+ - - -
///         |<->|                          +-------+   | (adj)
///         (adj)                          |   b   |
///                                        +-------+
/// ```
/// Overlapping spans also count as touching. The ordering test is
/// non-strict, so a rectangle is adjacent to itself.
pub fn adjacent(a: &Rect, b: &Rect, align_tolerance: f64, adj_tolerance: f64) -> bool {
    let vertically_aligned = (a.center_y() - b.center_y()).abs() <= align_tolerance;
    let horizontally_aligned = (a.center_x() - b.center_x()).abs() <= align_tolerance;

    let horizontally_adjacent = (a.x <= b.x && a.right() + adj_tolerance >= b.x)
        || (b.x <= a.x && b.right() + adj_tolerance >= a.x);
    let vertically_adjacent = (a.y <= b.y && a.bottom() + adj_tolerance >= b.y)
        || (b.y <= a.y && b.bottom() + adj_tolerance >= a.y);

    (vertically_aligned && horizontally_adjacent) || (horizontally_aligned && vertically_adjacent)
}

/// Smallest axis-aligned rectangle containing both inputs.
pub fn union(a: &Rect, b: &Rect) -> Rect {
    let x = a.x.min(b.x);
    let y = a.y.min(b.y);
    let right = a.right().max(b.right());
    let bottom = a.bottom().max(b.bottom());
    Rect::new(x, y, right - x, bottom - y)
}

/// Returns true iff `inner` lies within `outer` on all four sides (edges inclusive).
pub fn contains(inner: &Rect, outer: &Rect) -> bool {
    inner.x >= outer.x
        && inner.y >= outer.y
        && inner.right() <= outer.right()
        && inner.bottom() <= outer.bottom()
}
