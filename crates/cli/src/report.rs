//! Human and JSON renderings of results and presets.

use dpw::advice::suggestions;
use dpw::engine::{RunParams, RunStats};
use dpw::presets::{SCRIBE_PRESETS, WAFER_PRESETS};
use dpw::{CalculationResult, ValidationPolicy};
use serde::Serialize;
use serde_json::{json, Value};

/// Result without the per-position list.
#[derive(Debug, Serialize)]
pub struct Summary<'a> {
    pub total_dies: usize,
    pub yield_dies: usize,
    pub wafer_utilization: f64,
    pub policy: ValidationPolicy,
    pub params: &'a RunParams,
    pub stats: &'a RunStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

impl<'a> Summary<'a> {
    pub fn new(result: &'a CalculationResult, with_advice: bool) -> Self {
        Self {
            total_dies: result.total_dies,
            yield_dies: result.yield_dies,
            wafer_utilization: result.wafer_utilization,
            policy: result.policy,
            params: &result.params,
            stats: &result.stats,
            suggestions: with_advice.then(|| suggestions(result)),
        }
    }
}

/// `total_dies=… yield_dies=… utilization=…% method=… notch=…`
pub fn text_line(result: &CalculationResult) -> String {
    format!(
        "total_dies={} yield_dies={} utilization={:.2}% method={} notch={}",
        result.total_dies,
        result.yield_dies,
        result.wafer_utilization,
        result.policy,
        result.params.wafer.notch().kind
    )
}

pub fn presets_json() -> Value {
    json!({
        "wafer": WAFER_PRESETS,
        "scribe": SCRIBE_PRESETS,
        "methods": ValidationPolicy::ALL
            .iter()
            .map(|p| json!({ "name": p.as_str(), "description": p.description() }))
            .collect::<Vec<_>>(),
        "recommended_method": ValidationPolicy::recommended(),
    })
}

pub fn presets_text() -> String {
    let mut out = String::from("wafer presets:\n");
    for p in &WAFER_PRESETS {
        out.push_str(&format!(
            "  {:<18} {:>3} mm  edge {} mm  {} ({})\n",
            p.key,
            p.size.mm(),
            p.edge_exclusion_mm,
            p.description,
            p.applications.join(", ")
        ));
    }
    out.push_str("scribe presets:\n");
    for p in &SCRIBE_PRESETS {
        out.push_str(&format!(
            "  {:<18} {}x{} um  {}\n",
            p.key, p.x_um, p.y_um, p.description
        ));
    }
    out.push_str("validation methods:\n");
    for p in ValidationPolicy::ALL {
        let mark = if p == ValidationPolicy::recommended() { " (recommended)" } else { "" };
        out.push_str(&format!("  {:<18} {}{}\n", p.as_str(), p.description(), mark));
    }
    out
}
