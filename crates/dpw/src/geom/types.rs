//! Axis-aligned rectangles and the inclusive point-in-circle predicate.
//!
//! All circles are centered at the origin; every length is in millimetres.

use nalgebra::Vector2;

/// Closed disk membership `|p| <= r` (boundary counts as inside).
#[inline]
pub fn point_in_circle(p: Vector2<f64>, r: f64) -> bool {
    p.norm() <= r
}

/// Axis-aligned rectangle given by center and full extents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub center: Vector2<f64>,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[inline]
    pub fn new(center: Vector2<f64>, width: f64, height: f64) -> Self {
        Self {
            center,
            width,
            height,
        }
    }

    #[inline]
    pub fn half_extents(&self) -> Vector2<f64> {
        Vector2::new(self.width / 2.0, self.height / 2.0)
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    #[inline]
    pub fn min(&self) -> Vector2<f64> {
        self.center - self.half_extents()
    }

    #[inline]
    pub fn max(&self) -> Vector2<f64> {
        self.center + self.half_extents()
    }

    /// Corners in the order bottom-left, bottom-right, top-right, top-left.
    pub fn corners(&self) -> [Vector2<f64>; 4] {
        let (lo, hi) = (self.min(), self.max());
        [
            Vector2::new(lo.x, lo.y),
            Vector2::new(hi.x, lo.y),
            Vector2::new(hi.x, hi.y),
            Vector2::new(lo.x, hi.y),
        ]
    }

    /// Edge midpoints: bottom, top, left, right.
    pub fn edge_midpoints(&self) -> [Vector2<f64>; 4] {
        let (lo, hi) = (self.min(), self.max());
        let c = self.center;
        [
            Vector2::new(c.x, lo.y),
            Vector2::new(c.x, hi.y),
            Vector2::new(lo.x, c.y),
            Vector2::new(hi.x, c.y),
        ]
    }

    /// Corner with the largest distance from the origin.
    ///
    /// Returned in first-quadrant form `(|cx|+w/2, |cy|+h/2)`; its norm equals
    /// the maximum corner norm of the rectangle.
    #[inline]
    pub fn far_corner(&self) -> Vector2<f64> {
        self.center.abs() + self.half_extents()
    }

    /// Point of the rectangle closest to the origin.
    #[inline]
    pub fn closest_point_to_origin(&self) -> Vector2<f64> {
        let (lo, hi) = (self.min(), self.max());
        Vector2::new(0.0_f64.max(lo.x).min(hi.x), 0.0_f64.max(lo.y).min(hi.y))
    }

    /// Reflection across both axes into the first quadrant (center `|c|`).
    #[inline]
    pub fn reflected_to_first_quadrant(&self) -> Self {
        Self {
            center: self.center.abs(),
            ..*self
        }
    }
}
