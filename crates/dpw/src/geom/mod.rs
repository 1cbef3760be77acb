//! Planar geometry for die placement (disk centered at the origin).
//!
//! Purpose
//! - Inclusive point-in-circle test, axis-aligned rectangles with their
//!   corners/edge midpoints, and rectangle ∩ disk areas.
//!
//! Why this design
//! - Every kernel works on the rectangle reflected into the first quadrant, so
//!   the four mirror images of a die footprint produce identical results. The
//!   symmetric grid enumeration relies on this.
//!
//! Code cross-refs: `wafer::WaferGeometry`, `engine::DieCalculator`.

mod area;
mod types;

pub use area::{
    rect_circle_intersection_area, rect_circle_intersection_area_strips, AreaMethod,
    REFERENCE_STRIPS,
};
pub use types::{point_in_circle, Rect};
