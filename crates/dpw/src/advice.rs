//! Optimization hints derived from a finished calculation.

use crate::engine::CalculationResult;

const LOW_UTILIZATION_PCT: f64 = 70.0;
const HIGH_UTILIZATION_PCT: f64 = 95.0;
const LARGE_EDGE_EXCLUSION_MM: f64 = 5.0;
const LOW_DIE_COUNT: usize = 100;
const LOW_YIELD_PCT: f64 = 90.0;
const LOW_CACHE_HIT_RATE: f64 = 0.5;
const SLOW_RUN_S: f64 = 1.0;

/// Human-readable suggestions, most general first. Empty when nothing stands out.
pub fn suggestions(result: &CalculationResult) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let util = result.wafer_utilization;
    let params = &result.params;

    if util < LOW_UTILIZATION_PCT {
        out.push("Consider reducing scribe lane width to improve wafer utilization".into());
        out.push("Evaluate die size optimization to better fit wafer geometry".into());
    }
    if util > HIGH_UTILIZATION_PCT {
        out.push("Excellent wafer utilization achieved".into());
    }
    if params.wafer.edge_exclusion_mm() > LARGE_EDGE_EXCLUSION_MM {
        out.push("Edge exclusion zone is large - verify if this margin is necessary".into());
    }
    if result.total_dies < LOW_DIE_COUNT {
        out.push("Low die count - consider smaller die sizes or larger wafer".into());
    }
    if params.yield_percentage < LOW_YIELD_PCT {
        out.push("Consider yield improvement strategies".into());
    }

    if !params.engine.optimizations_enabled() {
        out.push("Enable engine optimizations (symmetry, pre-filter, cache) for faster runs".into());
    } else if result.stats.elapsed_s > SLOW_RUN_S {
        out.push(format!(
            "Calculation took {:.2}s - consider a coarser die pitch or a smaller candidate window",
            result.stats.elapsed_s
        ));
    }
    let cache = result.stats.cache();
    if params.engine.use_cache && cache.requests() > 0 && cache.hit_rate() < LOW_CACHE_HIT_RATE {
        out.push(format!(
            "Geometry cache hit rate is low ({:.0}%) - consider a larger cache capacity",
            cache.hit_rate() * 100.0
        ));
    }
    out
}
