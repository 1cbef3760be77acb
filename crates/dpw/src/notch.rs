//! Wafer notch: shape, area and the coarse die/notch overlap test.
//!
//! The notch sits at the bottom of the wafer (negative Y). Its footprint is
//! approximated by the band `y ∈ [−r, −r + d]` and `|x| <= half_width`, where
//! `r` is the uncut wafer radius and `d` the notch depth:
//! - `V90`: 90° V-cut, half-width at the rim equals `d`, area `d²`.
//! - `Flat`: chord at depth `d`, half-width `√(2rd − d²)`, area `2·half_width·d`.
//!
//! A die footprint that overlaps this bounding box is rejected outright, so
//! the test is conservative near the notch.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DpwError;
use crate::geom::Rect;

/// Notch shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotchKind {
    #[default]
    None,
    V90,
    Flat,
}

impl NotchKind {
    pub const ALL: [NotchKind; 3] = [NotchKind::None, NotchKind::V90, NotchKind::Flat];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::V90 => "v90",
            Self::Flat => "flat",
        }
    }
}

impl fmt::Display for NotchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotchKind {
    type Err = DpwError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "v90" => Ok(Self::V90),
            "flat" => Ok(Self::Flat),
            _ => Err(DpwError::UnknownNotch(s.to_string())),
        }
    }
}

/// Notch kind plus depth (mm). Depth is validated by `WaferSpec`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Notch {
    pub kind: NotchKind,
    pub depth_mm: f64,
}

impl Notch {
    pub const NONE: Notch = Notch {
        kind: NotchKind::None,
        depth_mm: 0.0,
    };

    pub fn new(kind: NotchKind, depth_mm: f64) -> Self {
        Self { kind, depth_mm }
    }

    /// True when the notch removes material (a shape other than `None` with
    /// positive depth).
    #[inline]
    pub fn is_active(&self) -> bool {
        self.kind != NotchKind::None && self.depth_mm > 0.0
    }

    /// Half-width of the notch footprint at the rim.
    pub fn half_width(&self, wafer_radius: f64) -> f64 {
        if !self.is_active() {
            return 0.0;
        }
        let d = self.depth_mm;
        match self.kind {
            NotchKind::None => 0.0,
            // tan(45°) = 1
            NotchKind::V90 => d,
            NotchKind::Flat => {
                let r = wafer_radius;
                (2.0 * r * d - d * d).max(0.0).sqrt()
            }
        }
    }

    /// Area removed by the notch (mm²).
    pub fn area(&self, wafer_radius: f64) -> f64 {
        if !self.is_active() {
            return 0.0;
        }
        let d = self.depth_mm;
        match self.kind {
            NotchKind::None => 0.0,
            NotchKind::V90 => d * d,
            NotchKind::Flat => 2.0 * self.half_width(wafer_radius) * d,
        }
    }

    /// Coarse overlap test between `rect` and the notch bounding box.
    pub fn intersects(&self, rect: &Rect, wafer_radius: f64) -> bool {
        if !self.is_active() {
            return false;
        }
        let band_lo = -wafer_radius;
        let band_hi = -wafer_radius + self.depth_mm;
        let half = self.half_width(wafer_radius);
        let (lo, hi) = (rect.min(), rect.max());
        lo.y <= band_hi && hi.y >= band_lo && lo.x <= half && hi.x >= -half
    }
}

impl Default for Notch {
    fn default() -> Self {
        Self::NONE
    }
}
