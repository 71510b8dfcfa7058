//! Geometry primitives for static course pieces
//!
//! Two shapes make up a course: axis-aligned rectangles (obstacles) and
//! line segments (ramps). Both answer the same question for collision:
//! the closest point on the shape to a ball center.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (x, y is the top-left corner)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        debug_assert!(w > 0.0 && h > 0.0, "degenerate rectangle");
        Self { x, y, w, h }
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Closest point on the rectangle to `p`, clamping x and y independently
    /// to the rectangle's extents. For a point inside the rectangle this is
    /// the point itself.
    pub fn closest_point(&self, p: DVec2) -> DVec2 {
        DVec2::new(
            p.x.clamp(self.left(), self.right()),
            p.y.clamp(self.top(), self.bottom()),
        )
    }
}

/// A line segment between two endpoints
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub p1: DVec2,
    pub p2: DVec2,
}

impl Segment {
    pub fn new(p1: DVec2, p2: DVec2) -> Self {
        Self { p1, p2 }
    }

    /// A zero-length segment has no defined normal and is skipped by the
    /// collision pass.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        (self.p2 - self.p1).length_squared() == 0.0
    }

    /// Closest point on the segment to `p`: project onto the infinite line
    /// through the endpoints and clamp the parameter to [0, 1].
    ///
    /// Returns `None` for a degenerate segment.
    pub fn closest_point(&self, p: DVec2) -> Option<DVec2> {
        let line = self.p2 - self.p1;
        let len_sq = line.length_squared();
        if len_sq == 0.0 {
            return None;
        }
        let t = ((p - self.p1).dot(line) / len_sq).clamp(0.0, 1.0);
        Some(self.p1 + line * t)
    }
}
