//! Flat input bundle accepted by the engine and by front ends.

use serde::{Deserialize, Serialize};

use crate::die::DieSpec;
use crate::error::{DpwError, Result, Violation};
use crate::notch::{Notch, NotchKind};
use crate::wafer::{ValidationPolicy, WaferSpec};

/// Every input of one calculation. Missing fields deserialize to the
/// defaults of `Params::default()`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    pub die_size_x_um: f64,
    pub die_size_y_um: f64,
    pub scribe_lane_x_um: f64,
    pub scribe_lane_y_um: f64,
    pub wafer_diameter_mm: f64,
    pub edge_exclusion_mm: f64,
    pub yield_percentage: f64,
    pub validation_method: ValidationPolicy,
    pub notch_type: NotchKind,
    pub notch_depth_mm: f64,
}

impl Default for Params {
    /// 1000×2000 µm die without scribe lanes on a 200 mm wafer, 3 mm edge
    /// exclusion, full yield, corner policy, no notch.
    fn default() -> Self {
        Self {
            die_size_x_um: 1000.0,
            die_size_y_um: 2000.0,
            scribe_lane_x_um: 0.0,
            scribe_lane_y_um: 0.0,
            wafer_diameter_mm: 200.0,
            edge_exclusion_mm: 3.0,
            yield_percentage: 100.0,
            validation_method: ValidationPolicy::Corner,
            notch_type: NotchKind::None,
            notch_depth_mm: 1.0,
        }
    }
}

impl Params {
    /// Check every field and build the validated specs. All violations are
    /// collected before failing.
    pub fn validate(&self) -> Result<(DieSpec, WaferSpec)> {
        let mut violations = DieSpec::violations(
            self.die_size_x_um,
            self.die_size_y_um,
            self.scribe_lane_x_um,
            self.scribe_lane_y_um,
        );
        violations.extend(WaferSpec::violations(
            self.wafer_diameter_mm,
            self.edge_exclusion_mm,
            self.notch_depth_mm,
        ));
        if let Some(v) = yield_violation(self.yield_percentage) {
            violations.push(v);
        }
        if !violations.is_empty() {
            return Err(DpwError::invalid(violations));
        }
        let die = DieSpec::new(
            self.die_size_x_um,
            self.die_size_y_um,
            self.scribe_lane_x_um,
            self.scribe_lane_y_um,
        )?;
        let wafer = WaferSpec::new(
            self.wafer_diameter_mm,
            self.edge_exclusion_mm,
            Notch::new(self.notch_type, self.notch_depth_mm),
        )?;
        Ok((die, wafer))
    }

    /// Legal but suspicious values. Never blocks a calculation.
    pub fn plausibility_warnings(&self) -> Vec<String> {
        let mut out = Vec::new();
        for (axis, v) in [("X", self.die_size_x_um), ("Y", self.die_size_y_um)] {
            if v > 50_000.0 {
                out.push(format!("die size {axis} seems too large (>50mm): {v}um"));
            }
        }
        for (axis, v) in [("X", self.scribe_lane_x_um), ("Y", self.scribe_lane_y_um)] {
            if v > 1000.0 {
                out.push(format!("scribe lane {axis} seems too large (>1mm): {v}um"));
            }
        }
        if self.wafer_diameter_mm < 25.0 {
            out.push(format!(
                "wafer diameter seems too small (<25mm): {}mm",
                self.wafer_diameter_mm
            ));
        }
        if self.wafer_diameter_mm > 450.0 {
            out.push(format!(
                "wafer diameter seems too large (>450mm): {}mm",
                self.wafer_diameter_mm
            ));
        }
        let effective_diameter = self.wafer_diameter_mm - 2.0 * self.edge_exclusion_mm;
        for (axis, die, scribe) in [
            ("X", self.die_size_x_um, self.scribe_lane_x_um),
            ("Y", self.die_size_y_um, self.scribe_lane_y_um),
        ] {
            let pitch_mm = (die + scribe) / 1000.0;
            if pitch_mm > effective_diameter {
                out.push(format!(
                    "die pitch {axis} ({pitch_mm:.1}mm) larger than effective wafer diameter ({effective_diameter:.1}mm)"
                ));
            }
        }
        out
    }
}

pub(crate) fn yield_violation(yield_percentage: f64) -> Option<Violation> {
    (!(0.0..=100.0).contains(&yield_percentage)).then(|| {
        Violation::new(
            "yield_percentage",
            format!("must be between 0 and 100, got {yield_percentage}"),
        )
    })
}
