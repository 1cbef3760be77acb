//! Validation policies: when does a die footprint count as placed?

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DpwError;

/// Rule deciding whether a footprint counts.
///
/// Acceptance nests as `Strict ⊆ Corner ⊆ Center` for the same geometry.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// Die center inside the effective circle.
    Center,
    /// All four corners inside.
    #[default]
    Corner,
    /// More than half of the footprint area inside.
    Area,
    /// Four corners and four edge midpoints inside.
    Strict,
}

impl ValidationPolicy {
    pub const ALL: [ValidationPolicy; 4] = [
        ValidationPolicy::Center,
        ValidationPolicy::Corner,
        ValidationPolicy::Area,
        ValidationPolicy::Strict,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Corner => "corner",
            Self::Area => "area",
            Self::Strict => "strict",
        }
    }

    /// Human-readable summary.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Center => "Conservative: count die if its center is within the wafer boundary",
            Self::Corner => {
                "Industry standard: count die if all corners are within the wafer boundary"
            }
            Self::Area => "Most accurate: count die if more than 50% of its area is within the wafer boundary",
            Self::Strict => {
                "Strictest: count die only if corners and edge midpoints are within the wafer boundary"
            }
        }
    }

    /// The industry default.
    pub fn recommended() -> Self {
        Self::Corner
    }
}

impl fmt::Display for ValidationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationPolicy {
    type Err = DpwError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "center" => Ok(Self::Center),
            "corner" => Ok(Self::Corner),
            "area" => Ok(Self::Area),
            "strict" => Ok(Self::Strict),
            _ => Err(DpwError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Outcome of validating one footprint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub accepted: bool,
    /// Covered-area fraction in [0, 1]. Point policies report 1.0 when
    /// accepted and 0.0 when rejected.
    pub fraction: f64,
}

impl Placement {
    pub const REJECTED: Placement = Placement {
        accepted: false,
        fraction: 0.0,
    };

    #[inline]
    pub(crate) fn from_points(accepted: bool) -> Self {
        Self {
            accepted,
            fraction: if accepted { 1.0 } else { 0.0 },
        }
    }

    #[inline]
    pub(crate) fn from_ratio(ratio: f64) -> Self {
        Self {
            accepted: ratio > 0.5,
            fraction: ratio,
        }
    }
}
