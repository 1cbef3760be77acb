//! Engine configuration and result types.

use nalgebra::Vector2;
use serde::Serialize;

use crate::cache::{CacheCfg, CacheStats};
use crate::die::DieSpec;
use crate::geom::AreaMethod;
use crate::params::Params;
use crate::wafer::{ValidationPolicy, WaferSpec};

/// Engine switches. All optimizations keep the output identical to a plain
/// full-grid scan with the same `area_method`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EngineCfg {
    /// Validate one quadrant and mirror it (ignored when a notch is active).
    pub use_symmetry: bool,
    /// Skip policy evaluation for centers beyond `R + half pitch diagonal`.
    pub use_prefilter: bool,
    /// Per-call `QuantizedCache` for position geometry.
    pub use_cache: bool,
    pub area_method: AreaMethod,
    pub cache: CacheCfg,
    /// Largest lattice the engine accepts before allocating.
    pub max_candidates: usize,
}

impl Default for EngineCfg {
    fn default() -> Self {
        Self {
            use_symmetry: true,
            use_prefilter: true,
            use_cache: true,
            area_method: AreaMethod::Exact,
            cache: CacheCfg::default(),
            max_candidates: 4_000_000,
        }
    }
}

impl EngineCfg {
    /// Plain full-grid scan with the 100-strip area scan.
    pub fn reference() -> Self {
        Self {
            use_symmetry: false,
            use_prefilter: false,
            use_cache: false,
            area_method: AreaMethod::reference(),
            ..Self::default()
        }
    }

    pub fn optimizations_enabled(&self) -> bool {
        self.use_symmetry || self.use_prefilter || self.use_cache
    }
}

/// One enumerated lattice candidate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DiePosition {
    /// Lattice index along Y.
    pub row: i64,
    /// Lattice index along X.
    pub col: i64,
    pub center_x: f64,
    pub center_y: f64,
    pub is_valid: bool,
    /// Covered-area fraction in [0, 1].
    pub area_ratio: f64,
    pub distance_from_center: f64,
}

impl DiePosition {
    pub fn center(&self) -> Vector2<f64> {
        Vector2::new(self.center_x, self.center_y)
    }
}

/// Inputs of a run plus the values derived from them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RunParams {
    pub die: DieSpec,
    pub wafer: WaferSpec,
    pub validation_method: ValidationPolicy,
    pub yield_percentage: f64,
    pub pitch_x_mm: f64,
    pub pitch_y_mm: f64,
    pub die_area_mm2: f64,
    pub effective_radius_mm: f64,
    pub notch_area_mm2: f64,
    pub engine: EngineCfg,
}

impl RunParams {
    /// Flat bundle that reproduces this run.
    pub fn to_params(&self) -> Params {
        let notch = self.wafer.notch();
        Params {
            die_size_x_um: self.die.die_x_um(),
            die_size_y_um: self.die.die_y_um(),
            scribe_lane_x_um: self.die.scribe_x_um(),
            scribe_lane_y_um: self.die.scribe_y_um(),
            wafer_diameter_mm: self.wafer.diameter_mm(),
            edge_exclusion_mm: self.wafer.edge_exclusion_mm(),
            yield_percentage: self.yield_percentage,
            validation_method: self.validation_method,
            notch_type: notch.kind,
            notch_depth_mm: notch.depth_mm,
        }
    }
}

/// Counters of one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct RunStats {
    /// Lattice size (length of `die_positions`).
    pub candidates: usize,
    /// Policy evaluations actually performed.
    pub evaluated: usize,
    /// Evaluations skipped by the distance pre-filter.
    pub prefiltered: usize,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub elapsed_s: f64,
}

impl RunStats {
    pub fn cache(&self) -> CacheStats {
        CacheStats {
            hits: self.cache_hits,
            misses: self.cache_misses,
        }
    }
}

/// Output of one engine run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CalculationResult {
    pub total_dies: usize,
    /// `floor(total_dies × yield% / 100)`.
    pub yield_dies: usize,
    /// Nominal die area over effective wafer area, in percent. May exceed 100
    /// for the `Area` policy with oversized dies.
    pub wafer_utilization: f64,
    /// Every candidate, valid or not, in canonical lattice order.
    pub die_positions: Vec<DiePosition>,
    pub policy: ValidationPolicy,
    pub params: RunParams,
    pub stats: RunStats,
}

impl CalculationResult {
    pub fn valid_positions(&self) -> impl Iterator<Item = &DiePosition> {
        self.die_positions.iter().filter(|p| p.is_valid)
    }

    pub fn invalid_count(&self) -> usize {
        self.die_positions.len() - self.total_dies
    }
}
