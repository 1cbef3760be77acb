//! Rectangle ∩ disk area kernels.
//!
//! Two evaluators share the same fast paths:
//! - `Exact`: closed form. The rectangle is folded into the first quadrant
//!   (up to four pieces), each piece is written as a difference of
//!   "strip under a horizontal line" areas, and those are sums of the circle
//!   antiderivative `H(x) = (x·√(r²−x²) + r²·asin(x/r)) / 2`.
//! - `Strips { n }`: midpoint-rule scan over `n` horizontal strips of the
//!   rectangle's vertical extent clipped to the circle (n = 100 is the
//!   reference resolution).
//!
//! Both evaluate the reflected rectangle `(|cx|, |cy|)`, so mirrored inputs
//! give bit-identical areas.

use serde::Serialize;

use super::types::{point_in_circle, Rect};

/// Strip count of the reference scan.
pub const REFERENCE_STRIPS: usize = 100;

/// Area evaluator used by the `Area` policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaMethod {
    #[default]
    Exact,
    Strips {
        n: usize,
    },
}

impl AreaMethod {
    /// The strip scan at the reference resolution.
    pub fn reference() -> Self {
        Self::Strips {
            n: REFERENCE_STRIPS,
        }
    }

    pub fn area(&self, rect: &Rect, r: f64) -> f64 {
        match *self {
            Self::Exact => rect_circle_intersection_area(rect, r),
            Self::Strips { n } => rect_circle_intersection_area_strips(rect, r, n),
        }
    }

    /// `area / rect.area()` clamped to [0, 1]; zero-area rectangles give 0.
    pub fn ratio(&self, rect: &Rect, r: f64) -> f64 {
        let full = rect.area();
        if full <= 0.0 {
            return 0.0;
        }
        (self.area(rect, r) / full).clamp(0.0, 1.0)
    }
}

enum Trivial {
    Outside,
    Inside(f64),
}

/// Shared fast paths on the reflected rectangle.
fn classify(rect: &Rect, r: f64) -> Option<Trivial> {
    if !(r > 0.0 && rect.width > 0.0 && rect.height > 0.0) {
        return Some(Trivial::Outside);
    }
    if !point_in_circle(rect.closest_point_to_origin(), r) {
        return Some(Trivial::Outside);
    }
    if point_in_circle(rect.far_corner(), r) {
        return Some(Trivial::Inside(rect.area()));
    }
    None
}

/// Exact area of `rect ∩ {|p| <= r}`.
pub fn rect_circle_intersection_area(rect: &Rect, r: f64) -> f64 {
    let rect = rect.reflected_to_first_quadrant();
    match classify(&rect, r) {
        Some(Trivial::Outside) => return 0.0,
        Some(Trivial::Inside(a)) => return a,
        None => {}
    }
    let (lo, hi) = (rect.min(), rect.max());
    let mut area = 0.0;
    for (x0, x1) in fold_at_zero(lo.x, hi.x).into_iter().flatten() {
        for (y0, y1) in fold_at_zero(lo.y, hi.y).into_iter().flatten() {
            area += first_quadrant_area(x0, x1, y0, y1, r);
        }
    }
    area.clamp(0.0, rect.area())
}

/// Midpoint-rule strip scan of `rect ∩ {|p| <= r}` with `strips` strips.
pub fn rect_circle_intersection_area_strips(rect: &Rect, r: f64, strips: usize) -> f64 {
    let rect = rect.reflected_to_first_quadrant();
    match classify(&rect, r) {
        Some(Trivial::Outside) => return 0.0,
        Some(Trivial::Inside(a)) => return a,
        None => {}
    }
    if strips == 0 {
        return 0.0;
    }
    let (lo, hi) = (rect.min(), rect.max());
    let y_start = lo.y.max(-r);
    let y_end = hi.y.min(r);
    if y_start >= y_end {
        return 0.0;
    }
    let dy = (y_end - y_start) / strips as f64;
    let mut area = 0.0;
    for k in 0..strips {
        let y = y_start + (k as f64 + 0.5) * dy;
        if y.abs() >= r {
            continue;
        }
        let half = (r * r - y * y).sqrt();
        let overlap = hi.x.min(half) - lo.x.max(-half);
        if overlap > 0.0 {
            area += overlap * dy;
        }
    }
    area.min(rect.area())
}

/// Split `[lo, hi]` at zero and reflect the negative part: up to two
/// intervals `[a, b]` with `0 <= a < b`.
fn fold_at_zero(lo: f64, hi: f64) -> [Option<(f64, f64)>; 2] {
    let pos = (hi > 0.0).then(|| (lo.max(0.0), hi));
    let neg = (lo < 0.0).then(|| ((-hi).max(0.0), -lo));
    [pos, neg]
}

/// Antiderivative of `√(r² − x²)`, clamped to `[-r, r]`.
#[inline]
fn circle_primitive(x: f64, r: f64) -> f64 {
    let x = x.max(-r).min(r);
    let s = (r * r - x * x).max(0.0).sqrt();
    0.5 * (x * s + r * r * (x / r).clamp(-1.0, 1.0).asin())
}

/// Area of `disk ∩ [x0, x1] × [0, y]` for `0 <= x0 <= x1`, `y >= 0`.
fn area_below(x0: f64, x1: f64, y: f64, r: f64) -> f64 {
    let x0 = x0.min(r);
    let x1 = x1.min(r);
    if x1 <= x0 || y <= 0.0 {
        return 0.0;
    }
    // The circle's upper half is at least `y` for x <= xc.
    let xc = if y >= r { 0.0 } else { (r * r - y * y).sqrt() };
    let m = xc.max(x0).min(x1);
    y * (m - x0) + circle_primitive(x1, r) - circle_primitive(m, r)
}

#[inline]
fn first_quadrant_area(x0: f64, x1: f64, y0: f64, y1: f64, r: f64) -> f64 {
    (area_below(x0, x1, y1, r) - area_below(x0, x1, y0, r)).max(0.0)
}
