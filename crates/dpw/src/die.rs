//! Die footprint: nominal size plus scribe lanes, and the derived pitch.

use nalgebra::Vector2;
use serde::Serialize;

use crate::error::{DpwError, Result, Violation};

const UM_PER_MM: f64 = 1000.0;

/// Die size and scribe lanes in micrometres. Validated on construction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DieSpec {
    die_x_um: f64,
    die_y_um: f64,
    scribe_x_um: f64,
    scribe_y_um: f64,
}

impl DieSpec {
    pub fn new(die_x_um: f64, die_y_um: f64, scribe_x_um: f64, scribe_y_um: f64) -> Result<Self> {
        let violations = Self::violations(die_x_um, die_y_um, scribe_x_um, scribe_y_um);
        if !violations.is_empty() {
            return Err(DpwError::invalid(violations));
        }
        Ok(Self {
            die_x_um,
            die_y_um,
            scribe_x_um,
            scribe_y_um,
        })
    }

    /// Range checks shared with `Params::validate`.
    pub(crate) fn violations(
        die_x_um: f64,
        die_y_um: f64,
        scribe_x_um: f64,
        scribe_y_um: f64,
    ) -> Vec<Violation> {
        let mut out = Vec::new();
        for (field, v) in [("die_size_x_um", die_x_um), ("die_size_y_um", die_y_um)] {
            if !(v.is_finite() && v > 0.0) {
                out.push(Violation::new(field, format!("must be positive, got {v}")));
            }
        }
        for (field, v) in [
            ("scribe_lane_x_um", scribe_x_um),
            ("scribe_lane_y_um", scribe_y_um),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                out.push(Violation::new(field, format!("must be non-negative, got {v}")));
            }
        }
        out
    }

    pub fn die_x_um(&self) -> f64 {
        self.die_x_um
    }
    pub fn die_y_um(&self) -> f64 {
        self.die_y_um
    }
    pub fn scribe_x_um(&self) -> f64 {
        self.scribe_x_um
    }
    pub fn scribe_y_um(&self) -> f64 {
        self.scribe_y_um
    }

    /// Nominal die size in mm.
    pub fn size_mm(&self) -> Vector2<f64> {
        Vector2::new(self.die_x_um / UM_PER_MM, self.die_y_um / UM_PER_MM)
    }

    /// Lattice pitch (die + scribe) in mm.
    pub fn pitch_mm(&self) -> Vector2<f64> {
        let scribe = Vector2::new(self.scribe_x_um / UM_PER_MM, self.scribe_y_um / UM_PER_MM);
        self.size_mm() + scribe
    }

    /// Nominal die area in mm² (scribe lanes excluded).
    pub fn area_mm2(&self) -> f64 {
        let s = self.size_mm();
        s.x * s.y
    }
}
