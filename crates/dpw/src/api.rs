//! Curated surface for front ends (CLI, notebooks, benches).
//!
//! Not a stability promise: names follow the modules and may move with them.

// Inputs
pub use crate::die::DieSpec;
pub use crate::notch::{Notch, NotchKind};
pub use crate::params::Params;
pub use crate::wafer::{Placement, ValidationPolicy, WaferGeometry, WaferSpec};
// Geometry kernels
pub use crate::geom::{
    point_in_circle, rect_circle_intersection_area, rect_circle_intersection_area_strips,
    AreaMethod, Rect, REFERENCE_STRIPS,
};
// Engine
pub use crate::cache::{CacheCfg, CacheStats, GeomCache, NoCache, QuantizedCache};
pub use crate::engine::{
    CalculationResult, DieCalculator, DiePosition, EngineCfg, RunParams, RunStats,
};
pub use crate::grid::{Lattice, SymmetryClass};
// Presets and hints
pub use crate::advice::suggestions;
pub use crate::presets::{
    scribe_preset, scribe_preset_keys, wafer_preset, wafer_preset_keys, wafer_presets_for,
    ScribePreset, WaferPreset, WaferSize, SCRIBE_PRESETS, WAFER_PRESETS,
};
