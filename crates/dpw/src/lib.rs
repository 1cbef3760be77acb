//! Die-per-wafer placement and validation.
//!
//! Counts how many rectangular dies (plus scribe lanes) fit on a circular
//! wafer with edge exclusion and an optional notch, under one of four
//! validation policies.
//!
//! Layout
//! - `geom`: point-in-circle, rectangle helpers, rectangle ∩ disk area.
//! - `notch`, `wafer`, `die`, `params`: validated inputs and per-policy checks.
//! - `grid`, `cache`, `engine`: lattice enumeration and the calculator.
//! - `presets`, `advice`: standard configurations and post-run hints.
//!
//! The library returns structured data only; formatting and I/O live in the
//! `dpw` binary (crate `cli`).

pub mod advice;
pub mod api;
pub mod cache;
pub mod die;
pub mod engine;
pub mod error;
pub mod geom;
pub mod grid;
pub mod notch;
pub mod params;
pub mod presets;
pub mod wafer;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use engine::{CalculationResult, DieCalculator, DiePosition, EngineCfg};
pub use error::{DpwError, Result};
pub use nalgebra::Vector2 as Vec2;
pub use params::Params;
pub use wafer::ValidationPolicy;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::die::DieSpec;
    pub use crate::engine::{CalculationResult, DieCalculator, DiePosition, EngineCfg};
    pub use crate::error::{DpwError, Result};
    pub use crate::notch::{Notch, NotchKind};
    pub use crate::params::Params;
    pub use crate::wafer::{ValidationPolicy, WaferSpec};
    pub use nalgebra::Vector2 as Vec2;
}
