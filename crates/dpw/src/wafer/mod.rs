//! Wafer description and per-policy footprint validation.
//!
//! Purpose
//! - `WaferSpec`: immutable, validated wafer description (diameter, edge
//!   exclusion, notch).
//! - `WaferGeometry`: the derived effective circle plus notch, answering
//!   "does this footprint count?" for each `ValidationPolicy`.
//!
//! Order of checks
//! - The notch is tested first; a footprint touching the notch bounding box
//!   is rejected with fraction 0 whatever the policy.
//! - Point policies compare distances with `<=` against the effective radius.
//!
//! Code cross-refs: `notch::Notch`, `geom::{Rect, AreaMethod}`.

mod policy;

pub use policy::{Placement, ValidationPolicy};

use nalgebra::Vector2;
use serde::Serialize;

use crate::error::{DpwError, Result, Violation};
use crate::geom::{point_in_circle, AreaMethod, Rect};
use crate::notch::Notch;

/// Wafer diameter, edge exclusion and notch (mm). Validated on construction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WaferSpec {
    diameter_mm: f64,
    edge_exclusion_mm: f64,
    notch: Notch,
}

impl WaferSpec {
    pub fn new(diameter_mm: f64, edge_exclusion_mm: f64, notch: Notch) -> Result<Self> {
        let violations = Self::violations(diameter_mm, edge_exclusion_mm, notch.depth_mm);
        if !violations.is_empty() {
            return Err(DpwError::invalid(violations));
        }
        Ok(Self {
            diameter_mm,
            edge_exclusion_mm,
            notch,
        })
    }

    /// Range checks shared with `Params::validate`.
    pub(crate) fn violations(
        diameter_mm: f64,
        edge_exclusion_mm: f64,
        notch_depth_mm: f64,
    ) -> Vec<Violation> {
        let mut out = Vec::new();
        let diameter_ok = diameter_mm.is_finite() && diameter_mm > 0.0;
        if !diameter_ok {
            out.push(Violation::new(
                "wafer_diameter_mm",
                format!("must be positive, got {diameter_mm}"),
            ));
        }
        let radius = diameter_mm / 2.0;
        if !(edge_exclusion_mm.is_finite() && edge_exclusion_mm >= 0.0) {
            out.push(Violation::new(
                "edge_exclusion_mm",
                format!("must be non-negative, got {edge_exclusion_mm}"),
            ));
        } else if diameter_ok && edge_exclusion_mm >= radius {
            out.push(Violation::new(
                "edge_exclusion_mm",
                format!(
                    "must be smaller than the wafer radius ({radius}mm), got {edge_exclusion_mm}; effective radius would be {}mm",
                    radius - edge_exclusion_mm
                ),
            ));
        }
        if !(notch_depth_mm.is_finite() && notch_depth_mm >= 0.0) {
            out.push(Violation::new(
                "notch_depth_mm",
                format!("must be non-negative, got {notch_depth_mm}"),
            ));
        } else if diameter_ok && notch_depth_mm >= radius {
            out.push(Violation::new(
                "notch_depth_mm",
                format!("must be smaller than the wafer radius ({radius}mm), got {notch_depth_mm}"),
            ));
        }
        out
    }

    pub fn diameter_mm(&self) -> f64 {
        self.diameter_mm
    }
    pub fn edge_exclusion_mm(&self) -> f64 {
        self.edge_exclusion_mm
    }
    pub fn notch(&self) -> Notch {
        self.notch
    }

    /// Uncut wafer radius.
    pub fn radius_mm(&self) -> f64 {
        self.diameter_mm / 2.0
    }

    /// Radius minus edge exclusion; always positive once validated.
    pub fn effective_radius_mm(&self) -> f64 {
        self.radius_mm() - self.edge_exclusion_mm
    }
}

/// Effective circle + notch, ready to validate footprints.
#[derive(Clone, Copy, Debug)]
pub struct WaferGeometry {
    radius: f64,
    effective_radius: f64,
    notch: Notch,
    area_method: AreaMethod,
}

impl WaferGeometry {
    pub fn new(spec: &WaferSpec, area_method: AreaMethod) -> Self {
        Self {
            radius: spec.radius_mm(),
            effective_radius: spec.effective_radius_mm(),
            notch: spec.notch(),
            area_method,
        }
    }

    pub fn effective_radius(&self) -> f64 {
        self.effective_radius
    }

    pub fn has_notch(&self) -> bool {
        self.notch.is_active()
    }

    pub fn notch_area(&self) -> f64 {
        self.notch.area(self.radius)
    }

    #[inline]
    pub fn is_point_in_wafer(&self, p: Vector2<f64>) -> bool {
        point_in_circle(p, self.effective_radius)
    }

    #[inline]
    pub fn intersects_notch(&self, rect: &Rect) -> bool {
        self.notch.intersects(rect, self.radius)
    }

    /// Validate `rect` under `policy`.
    pub fn place(&self, rect: &Rect, policy: ValidationPolicy) -> Placement {
        if self.intersects_notch(rect) {
            return Placement::REJECTED;
        }
        match policy {
            ValidationPolicy::Center => Placement::from_points(self.is_point_in_wafer(rect.center)),
            ValidationPolicy::Corner => Placement::from_points(self.corners_inside(rect)),
            ValidationPolicy::Area => {
                Placement::from_ratio(self.area_method.ratio(rect, self.effective_radius))
            }
            ValidationPolicy::Strict => Placement::from_points(
                self.corners_inside(rect)
                    && rect
                        .edge_midpoints()
                        .iter()
                        .all(|&p| self.is_point_in_wafer(p)),
            ),
        }
    }

    /// All four corners inside; the farthest corner decides.
    #[inline]
    fn corners_inside(&self, rect: &Rect) -> bool {
        self.is_point_in_wafer(rect.far_corner())
    }
}
