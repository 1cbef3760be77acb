//! Parameter flags shared by `calc` and `compare`, and their merge into `Params`.
//!
//! Precedence: built-in defaults < `--config` file < presets < explicit flags.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use clap::Args;
use dpw::notch::NotchKind;
use dpw::{EngineCfg, Params, ValidationPolicy};

use crate::config;

/// `AxB` pair of non-negative numbers (`x` or `X` as separator).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pair {
    pub x: f64,
    pub y: f64,
}

impl FromStr for Pair {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let (a, b) = lower
            .split_once('x')
            .ok_or_else(|| format!("expected AxB (e.g. 1000x2000), got {s:?}"))?;
        let parse = |t: &str| {
            t.trim()
                .parse::<f64>()
                .map_err(|e| format!("bad number {t:?} in {s:?}: {e}"))
        };
        Ok(Self {
            x: parse(a)?,
            y: parse(b)?,
        })
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.x, self.y)
    }
}

#[derive(Args, Clone, Debug, Default)]
pub struct ParamArgs {
    /// Wafer diameter in mm
    pub wafer_mm: Option<f64>,
    /// Die size in µm as XxY, e.g. 1000x2000
    pub die: Option<Pair>,
    /// Scribe lanes in µm as XxY
    #[arg(long)]
    pub scribe: Option<Pair>,
    /// Edge exclusion in mm
    #[arg(long)]
    pub edge: Option<f64>,
    /// Yield percentage (0-100)
    #[arg(long = "yield")]
    pub yield_pct: Option<f64>,
    /// Validation method: center, corner, area or strict
    #[arg(long)]
    pub method: Option<ValidationPolicy>,
    /// Notch type: none, v90 or flat
    #[arg(long)]
    pub notch: Option<NotchKind>,
    /// Notch depth in mm
    #[arg(long)]
    pub notch_depth: Option<f64>,
    /// JSON config file with a `dpw` section
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Wafer preset, e.g. 8inch_mainstream
    #[arg(long)]
    pub wafer_preset: Option<String>,
    /// Scribe lane preset, e.g. standard
    #[arg(long)]
    pub scribe_preset: Option<String>,
    /// Plain full-grid scan with the strip area (no symmetry, pre-filter or cache)
    #[arg(long)]
    pub reference: bool,
}

impl ParamArgs {
    pub fn resolve(&self) -> Result<Params> {
        let mut p = match &self.config {
            Some(path) => config::load(path)?,
            None => Params::default(),
        };
        if let Some(key) = &self.wafer_preset {
            p.apply_wafer_preset(key)?;
        }
        if let Some(key) = &self.scribe_preset {
            p.apply_scribe_preset(key)?;
        }
        if let Some(w) = self.wafer_mm {
            p.wafer_diameter_mm = w;
        }
        if let Some(d) = self.die {
            p.die_size_x_um = d.x;
            p.die_size_y_um = d.y;
        }
        if let Some(s) = self.scribe {
            p.scribe_lane_x_um = s.x;
            p.scribe_lane_y_um = s.y;
        }
        if let Some(e) = self.edge {
            p.edge_exclusion_mm = e;
        }
        if let Some(y) = self.yield_pct {
            p.yield_percentage = y;
        }
        if let Some(m) = self.method {
            p.validation_method = m;
        }
        if let Some(n) = self.notch {
            p.notch_type = n;
        }
        if let Some(d) = self.notch_depth {
            p.notch_depth_mm = d;
        }
        for w in p.plausibility_warnings() {
            tracing::warn!("{w}");
        }
        Ok(p)
    }

    pub fn engine_cfg(&self) -> EngineCfg {
        if self.reference {
            EngineCfg::reference()
        } else {
            EngineCfg::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::tempdir;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: ParamArgs,
    }

    fn parse(argv: &[&str]) -> ParamArgs {
        let mut full = vec!["dpw"];
        full.extend_from_slice(argv);
        Harness::try_parse_from(full).unwrap().args
    }

    #[test]
    fn pair_accepts_either_case_separator() {
        assert_eq!("1000x2000".parse::<Pair>().unwrap(), Pair { x: 1000.0, y: 2000.0 });
        assert_eq!(" 50X60 ".parse::<Pair>().unwrap(), Pair { x: 50.0, y: 60.0 });
        assert!("1000".parse::<Pair>().is_err());
        assert!("ax2".parse::<Pair>().is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let a = parse(&[
            "300", "5000x5000", "--scribe", "80x80", "--edge", "4", "--yield", "90", "--method",
            "strict", "--notch", "v90", "--notch-depth", "2",
        ]);
        let p = a.resolve().unwrap();
        assert_eq!(p.wafer_diameter_mm, 300.0);
        assert_eq!((p.die_size_x_um, p.die_size_y_um), (5000.0, 5000.0));
        assert_eq!((p.scribe_lane_x_um, p.scribe_lane_y_um), (80.0, 80.0));
        assert_eq!(p.edge_exclusion_mm, 4.0);
        assert_eq!(p.yield_percentage, 90.0);
        assert_eq!(p.validation_method, ValidationPolicy::Strict);
        assert_eq!(p.notch_type, NotchKind::V90);
        assert_eq!(p.notch_depth_mm, 2.0);
        assert_eq!(a.engine_cfg(), EngineCfg::default());
    }

    #[test]
    fn presets_sit_between_config_and_flags() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        let from_file = Params {
            wafer_diameter_mm: 100.0,
            scribe_lane_x_um: 7.0,
            yield_percentage: 75.0,
            ..Params::default()
        };
        config::save(&path, &from_file).unwrap();

        let a = parse(&[
            "--config",
            path.to_str().unwrap(),
            "--wafer-preset",
            "12inch_advanced",
            "--edge",
            "1",
        ]);
        let p = a.resolve().unwrap();
        assert_eq!(p.wafer_diameter_mm, 300.0); // preset beats file
        assert_eq!(p.edge_exclusion_mm, 1.0); // flag beats preset
        assert_eq!(p.scribe_lane_x_um, 7.0); // file beats default
        assert_eq!(p.yield_percentage, 75.0);
    }

    #[test]
    fn unknown_names_are_rejected() {
        let bad = Harness::try_parse_from(["dpw", "--method", "diagonal"]);
        assert!(bad.is_err());
        let a = parse(&["--scribe-preset", "huge"]);
        assert!(a.resolve().is_err());
    }

    #[test]
    fn reference_flag_selects_reference_engine() {
        assert_eq!(parse(&["--reference"]).engine_cfg(), EngineCfg::reference());
    }
}
