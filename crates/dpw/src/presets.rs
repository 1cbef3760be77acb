//! Standard wafer sizes, wafer presets and scribe-lane presets.

use serde::Serialize;

use crate::error::{DpwError, Result};
use crate::params::Params;

/// Standard wafer sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum WaferSize {
    Inch4,
    Inch6,
    Inch8,
    Inch12,
}

impl WaferSize {
    pub const ALL: [WaferSize; 4] = [Self::Inch4, Self::Inch6, Self::Inch8, Self::Inch12];

    pub fn inches(&self) -> u32 {
        match self {
            Self::Inch4 => 4,
            Self::Inch6 => 6,
            Self::Inch8 => 8,
            Self::Inch12 => 12,
        }
    }

    pub fn mm(&self) -> u32 {
        match self {
            Self::Inch4 => 100,
            Self::Inch6 => 150,
            Self::Inch8 => 200,
            Self::Inch12 => 300,
        }
    }

    pub fn from_inches(inches: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.inches() == inches)
    }

    pub fn from_mm(mm: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.mm() == mm)
    }
}

/// Wafer size plus the edge exclusion used with it in practice.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WaferPreset {
    /// Lookup key, e.g. `8inch_mainstream`.
    pub key: &'static str,
    pub name: &'static str,
    pub size: WaferSize,
    pub edge_exclusion_mm: f64,
    pub description: &'static str,
    pub applications: &'static [&'static str],
}

impl WaferPreset {
    pub fn diameter_mm(&self) -> f64 {
        f64::from(self.size.mm())
    }
}

pub const WAFER_PRESETS: [WaferPreset; 4] = [
    WaferPreset {
        key: "4inch_standard",
        name: "4-inch Standard",
        size: WaferSize::Inch4,
        edge_exclusion_mm: 2.0,
        description: "Standard 4-inch wafer for research and development",
        applications: &["R&D", "Prototyping", "Small volume production"],
    },
    WaferPreset {
        key: "6inch_production",
        name: "6-inch Production",
        size: WaferSize::Inch6,
        edge_exclusion_mm: 3.0,
        description: "6-inch wafer for medium volume production",
        applications: &["Analog devices", "Power semiconductors", "MEMS"],
    },
    WaferPreset {
        key: "8inch_mainstream",
        name: "8-inch Mainstream",
        size: WaferSize::Inch8,
        edge_exclusion_mm: 3.0,
        description: "8-inch wafer for mainstream semiconductor production",
        applications: &["Logic devices", "Memory", "Mixed-signal ICs"],
    },
    WaferPreset {
        key: "12inch_advanced",
        name: "12-inch Advanced",
        size: WaferSize::Inch12,
        edge_exclusion_mm: 5.0,
        description: "12-inch wafer for advanced high-volume production",
        applications: &["Advanced logic", "High-density memory", "System-on-chip"],
    },
];

/// Scribe-lane widths in µm.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScribePreset {
    pub key: &'static str,
    pub x_um: f64,
    pub y_um: f64,
    pub description: &'static str,
}

pub const SCRIBE_PRESETS: [ScribePreset; 5] = [
    ScribePreset {
        key: "minimal",
        x_um: 20.0,
        y_um: 20.0,
        description: "Minimal scribe lanes for maximum die count",
    },
    ScribePreset {
        key: "standard",
        x_um: 50.0,
        y_um: 50.0,
        description: "Standard scribe lanes for most applications",
    },
    ScribePreset {
        key: "wide",
        x_um: 80.0,
        y_um: 80.0,
        description: "Wide scribe lanes for enhanced dicing reliability",
    },
    ScribePreset {
        key: "test",
        x_um: 100.0,
        y_um: 100.0,
        description: "Extra wide scribe lanes for test structures",
    },
    ScribePreset {
        key: "asymmetric",
        x_um: 60.0,
        y_um: 40.0,
        description: "Asymmetric scribe lanes for rectangular dies",
    },
];

pub fn wafer_preset(key: &str) -> Result<&'static WaferPreset> {
    WAFER_PRESETS
        .iter()
        .find(|p| p.key == key)
        .ok_or_else(|| DpwError::UnknownPreset {
            kind: "wafer",
            name: key.to_string(),
            available: wafer_preset_keys().join(", "),
        })
}

pub fn wafer_preset_keys() -> Vec<&'static str> {
    WAFER_PRESETS.iter().map(|p| p.key).collect()
}

pub fn wafer_presets_for(size: WaferSize) -> Vec<&'static WaferPreset> {
    WAFER_PRESETS.iter().filter(|p| p.size == size).collect()
}

pub fn scribe_preset(key: &str) -> Result<&'static ScribePreset> {
    SCRIBE_PRESETS
        .iter()
        .find(|p| p.key == key)
        .ok_or_else(|| DpwError::UnknownPreset {
            kind: "scribe lane",
            name: key.to_string(),
            available: scribe_preset_keys().join(", "),
        })
}

pub fn scribe_preset_keys() -> Vec<&'static str> {
    SCRIBE_PRESETS.iter().map(|p| p.key).collect()
}

impl Params {
    /// Overwrite diameter and edge exclusion from a wafer preset.
    pub fn apply_wafer_preset(&mut self, key: &str) -> Result<()> {
        let p = wafer_preset(key)?;
        self.wafer_diameter_mm = p.diameter_mm();
        self.edge_exclusion_mm = p.edge_exclusion_mm;
        Ok(())
    }

    /// Overwrite both scribe lanes from a scribe preset.
    pub fn apply_scribe_preset(&mut self, key: &str) -> Result<()> {
        let p = scribe_preset(key)?;
        self.scribe_lane_x_um = p.x_um;
        self.scribe_lane_y_um = p.y_um;
        Ok(())
    }
}
