//! Calculation engine: lattice enumeration, per-policy validation, aggregation.
//!
//! Purpose
//! - Turn a validated die + wafer description into the count of placed dies,
//!   the yield-adjusted count, the utilization and the full list of lattice
//!   candidates with their outcome.
//! - Compare all validation policies on one parameter bundle.
//!
//! Why this design
//! - One code path with switches (`EngineCfg`) instead of separate "fast" and
//!   "reference" engines: symmetry, pre-filter and cache only decide how much
//!   work is done, never what is emitted.
//! - Symmetric runs validate the closed first quadrant and then emit the full
//!   window in canonical order, each point taking the result of `(|i|, |j|)`.
//!   Validation is evaluated on reflected footprints, so mirrored results are
//!   bit-identical and the emitted list equals the full-grid scan.
//!
//! Code cross-refs: `grid::Lattice`, `wafer::WaferGeometry::place`,
//! `cache::GeomCache`.

mod types;

pub use types::{CalculationResult, DiePosition, EngineCfg, RunParams, RunStats};

use std::collections::BTreeMap;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::cache::{GeomCache, NoCache, QuantizedCache};
use crate::die::DieSpec;
use crate::error::{DpwError, Result};
use crate::geom::Rect;
use crate::grid::Lattice;
use crate::params::{yield_violation, Params};
use crate::wafer::{Placement, ValidationPolicy, WaferGeometry, WaferSpec};

/// Stateless calculator; cheap to copy and shareable across threads.
#[derive(Clone, Copy, Debug, Default)]
pub struct DieCalculator {
    cfg: EngineCfg,
}

impl DieCalculator {
    pub fn new(cfg: EngineCfg) -> Self {
        Self { cfg }
    }

    /// Full-grid scan with the reference strip area.
    pub fn reference() -> Self {
        Self::new(EngineCfg::reference())
    }

    pub fn cfg(&self) -> &EngineCfg {
        &self.cfg
    }

    /// Validate `params` and run with its policy and yield.
    pub fn calculate_params(&self, params: &Params) -> Result<CalculationResult> {
        let (die, wafer) = params.validate()?;
        self.calculate(
            &die,
            &wafer,
            params.validation_method,
            params.yield_percentage,
        )
    }

    /// Run one calculation with a cache chosen by `EngineCfg::use_cache`.
    pub fn calculate(
        &self,
        die: &DieSpec,
        wafer: &WaferSpec,
        policy: ValidationPolicy,
        yield_percentage: f64,
    ) -> Result<CalculationResult> {
        if self.cfg.use_cache {
            let pitch = die.pitch_mm();
            let mut cache = QuantizedCache::new(self.cfg.cache.for_pitch(pitch.x.min(pitch.y)));
            self.calculate_with_cache(die, wafer, policy, yield_percentage, &mut cache)
        } else {
            self.calculate_with_cache(die, wafer, policy, yield_percentage, &mut NoCache)
        }
    }

    /// Run one calculation using a caller-supplied cache.
    pub fn calculate_with_cache(
        &self,
        die: &DieSpec,
        wafer: &WaferSpec,
        policy: ValidationPolicy,
        yield_percentage: f64,
        cache: &mut dyn GeomCache,
    ) -> Result<CalculationResult> {
        if let Some(v) = yield_violation(yield_percentage) {
            return Err(DpwError::invalid(vec![v]));
        }
        let started = Instant::now();
        let geometry = WaferGeometry::new(wafer, self.cfg.area_method);
        let r = geometry.effective_radius();
        let pitch = die.pitch_mm();
        let lattice = Lattice::covering(pitch, r);
        let candidates = lattice.candidate_count();
        if candidates > self.cfg.max_candidates {
            return Err(DpwError::TooManyCandidates {
                count: candidates,
                limit: self.cfg.max_candidates,
            });
        }
        let symmetric = self.cfg.use_symmetry && !geometry.has_notch();
        info!(
            policy = %policy,
            notch = %wafer.notch().kind,
            wafer_mm = wafer.diameter_mm(),
            pitch_x_mm = pitch.x,
            pitch_y_mm = pitch.y,
            "die-per-wafer calculation started"
        );

        let mut stats = RunStats {
            candidates,
            ..RunStats::default()
        };
        let scan = Scan {
            lattice: &lattice,
            geometry: &geometry,
            policy,
            prefilter: self
                .cfg
                .use_prefilter
                .then(|| lattice.prefilter_radius(r)),
        };
        let placements: Vec<Placement> = if symmetric {
            lattice
                .quadrant_indices()
                .map(|(i, j)| scan.evaluate(i, j, &mut stats))
                .collect()
        } else {
            lattice
                .indices()
                .map(|(i, j)| scan.evaluate(i, j, &mut stats))
                .collect()
        };
        debug!(
            candidates,
            evaluated = stats.evaluated,
            prefiltered = stats.prefiltered,
            symmetric,
            "lattice scanned"
        );

        let mut die_positions = Vec::with_capacity(candidates);
        for (k, (i, j)) in lattice.indices().enumerate() {
            let placement = if symmetric {
                placements[lattice.quadrant_slot(i, j)]
            } else {
                placements[k]
            };
            let c = lattice.center(i, j);
            let distance_from_center = cache.get_or_compute(c.x, c.y, &mut || c.norm());
            die_positions.push(DiePosition {
                row: j,
                col: i,
                center_x: c.x,
                center_y: c.y,
                is_valid: placement.accepted,
                area_ratio: placement.fraction,
                distance_from_center,
            });
        }
        let cache_stats = cache.stats();
        stats.cache_hits = cache_stats.hits;
        stats.cache_misses = cache_stats.misses;
        debug!(
            hits = cache_stats.hits,
            misses = cache_stats.misses,
            hit_rate = cache_stats.hit_rate(),
            "geometry cache"
        );

        let total_dies = die_positions.iter().filter(|p| p.is_valid).count();
        let yield_dies = (total_dies as f64 * yield_percentage / 100.0).floor() as usize;
        let die_area_mm2 = die.area_mm2();
        let wafer_utilization =
            total_dies as f64 * die_area_mm2 / (std::f64::consts::PI * r * r) * 100.0;
        if wafer_utilization > 100.0 {
            warn!(
                utilization = wafer_utilization,
                policy = %policy,
                "utilization above 100%: dies larger than the area they cover"
            );
        }
        stats.elapsed_s = started.elapsed().as_secs_f64();
        info!(
            policy = %policy,
            total = total_dies,
            yield_dies,
            utilization = wafer_utilization,
            elapsed_s = stats.elapsed_s,
            "die-per-wafer calculation finished"
        );

        Ok(CalculationResult {
            total_dies,
            yield_dies,
            wafer_utilization,
            die_positions,
            policy,
            params: RunParams {
                die: *die,
                wafer: *wafer,
                validation_method: policy,
                yield_percentage,
                pitch_x_mm: pitch.x,
                pitch_y_mm: pitch.y,
                die_area_mm2,
                effective_radius_mm: r,
                notch_area_mm2: geometry.notch_area(),
                engine: self.cfg,
            },
            stats,
        })
    }

    /// Run `params` once per policy. Failed runs are logged and left out.
    pub fn compare(&self, params: &Params) -> BTreeMap<ValidationPolicy, CalculationResult> {
        self.compare_methods(params, &ValidationPolicy::ALL)
    }

    /// Like `compare`, restricted to `methods`; repeated entries run once.
    pub fn compare_methods(
        &self,
        params: &Params,
        methods: &[ValidationPolicy],
    ) -> BTreeMap<ValidationPolicy, CalculationResult> {
        let mut out = BTreeMap::new();
        for &policy in methods {
            if out.contains_key(&policy) {
                continue;
            }
            let p = Params {
                validation_method: policy,
                ..params.clone()
            };
            match self.calculate_params(&p) {
                Ok(res) => {
                    out.insert(policy, res);
                }
                Err(e) => error!(policy = %policy, error = %e, "policy run failed"),
            }
        }
        out
    }
}

/// Per-run view used to validate one lattice point.
struct Scan<'a> {
    lattice: &'a Lattice,
    geometry: &'a WaferGeometry,
    policy: ValidationPolicy,
    prefilter: Option<f64>,
}

impl Scan<'_> {
    fn evaluate(&self, i: i64, j: i64, stats: &mut RunStats) -> Placement {
        let c = self.lattice.center(i, j);
        if let Some(limit) = self.prefilter {
            if c.norm() > limit {
                stats.prefiltered += 1;
                return Placement::REJECTED;
            }
        }
        stats.evaluated += 1;
        let pitch = self.lattice.pitch();
        self.geometry
            .place(&Rect::new(c, pitch.x, pitch.y), self.policy)
    }
}

#[cfg(test)]
mod tests;
