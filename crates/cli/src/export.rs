//! Tabular I/O with polars: per-position export and batch sweeps.

use std::fs::{self, File};
use std::path::Path;

use anyhow::{Context, Result};
use dpw::{CalculationResult, DieCalculator, Params};
use polars::prelude::*;
use serde_json::json;

use crate::provenance::{write_sidecar, Payload};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Csv,
    Parquet,
}

/// One row per lattice candidate.
pub fn positions_frame(result: &CalculationResult) -> PolarsResult<DataFrame> {
    let pos = &result.die_positions;
    df!(
        "row" => pos.iter().map(|p| p.row).collect::<Vec<i64>>(),
        "col" => pos.iter().map(|p| p.col).collect::<Vec<i64>>(),
        "center_x_mm" => pos.iter().map(|p| p.center_x).collect::<Vec<f64>>(),
        "center_y_mm" => pos.iter().map(|p| p.center_y).collect::<Vec<f64>>(),
        "is_valid" => pos.iter().map(|p| p.is_valid).collect::<Vec<bool>>(),
        "area_ratio" => pos.iter().map(|p| p.area_ratio).collect::<Vec<f64>>(),
        "distance_from_center_mm" => pos.iter().map(|p| p.distance_from_center).collect::<Vec<f64>>(),
    )
}

pub fn write_frame(df: &mut DataFrame, path: &Path, format: Format) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    match format {
        Format::Csv => CsvWriter::new(&mut file)
            .include_header(true)
            .finish(df)
            .with_context(|| format!("writing CSV {}", path.display()))?,
        Format::Parquet => {
            ParquetWriter::new(&mut file)
                .finish(df)
                .with_context(|| format!("writing Parquet {}", path.display()))?;
        }
    }
    Ok(())
}

/// Export every position of `result` and write its provenance sidecar.
pub fn export_positions(result: &CalculationResult, path: &Path, format: Format) -> Result<()> {
    let mut df = positions_frame(result)?;
    write_frame(&mut df, path, format)?;
    let payload = Payload::new(serde_json::to_value(result.params.to_params())?).with_summary(
        json!({
            "total_dies": result.total_dies,
            "yield_dies": result.yield_dies,
            "wafer_utilization": result.wafer_utilization,
            "rows": df.height(),
        }),
    );
    write_sidecar(path, payload)?;
    tracing::info!(path = %path.display(), rows = df.height(), "positions exported");
    Ok(())
}

const NUMERIC_COLUMNS: [&str; 8] = [
    "die_size_x_um",
    "die_size_y_um",
    "scribe_lane_x_um",
    "scribe_lane_y_um",
    "wafer_diameter_mm",
    "edge_exclusion_mm",
    "yield_percentage",
    "notch_depth_mm",
];

fn numeric_field<'a>(p: &'a mut Params, name: &str) -> Option<&'a mut f64> {
    match name {
        "die_size_x_um" => Some(&mut p.die_size_x_um),
        "die_size_y_um" => Some(&mut p.die_size_y_um),
        "scribe_lane_x_um" => Some(&mut p.scribe_lane_x_um),
        "scribe_lane_y_um" => Some(&mut p.scribe_lane_y_um),
        "wafer_diameter_mm" => Some(&mut p.wafer_diameter_mm),
        "edge_exclusion_mm" => Some(&mut p.edge_exclusion_mm),
        "yield_percentage" => Some(&mut p.yield_percentage),
        "notch_depth_mm" => Some(&mut p.notch_depth_mm),
        _ => None,
    }
}

/// Read one `Params` per CSV row. Columns are named after the `Params` fields;
/// missing columns and empty cells take the defaults.
pub fn read_param_rows(path: &Path) -> Result<Vec<Params>> {
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(100))
        .finish()
        .and_then(|lf| lf.collect())
        .with_context(|| format!("reading batch input {}", path.display()))?;
    let n = df.height();
    let mut rows = vec![Params::default(); n];

    for name in NUMERIC_COLUMNS {
        let Ok(col) = df.column(name) else { continue };
        let col = col
            .cast(&DataType::Float64)
            .with_context(|| format!("column {name} is not numeric"))?;
        for (row, v) in rows.iter_mut().zip(col.f64()?.into_iter()) {
            if let (Some(v), Some(field)) = (v, numeric_field(row, name)) {
                *field = v;
            }
        }
    }
    if let Ok(col) = df.column("validation_method") {
        let col = col.cast(&DataType::String)?;
        for (k, (row, v)) in rows.iter_mut().zip(col.str()?.into_iter()).enumerate() {
            if let Some(v) = v {
                row.validation_method =
                    v.parse().with_context(|| format!("row {k}: validation_method"))?;
            }
        }
    }
    if let Ok(col) = df.column("notch_type") {
        let col = col.cast(&DataType::String)?;
        for (k, (row, v)) in rows.iter_mut().zip(col.str()?.into_iter()).enumerate() {
            if let Some(v) = v {
                row.notch_type = v.parse().with_context(|| format!("row {k}: notch_type"))?;
            }
        }
    }
    Ok(rows)
}

/// Run every row and write one result row each. Failed rows keep their
/// inputs, carry the error message and null counts.
pub fn run_batch(calc: &DieCalculator, input: &Path, out: &Path) -> Result<usize> {
    let rows = read_param_rows(input)?;
    let mut total = Vec::with_capacity(rows.len());
    let mut yielded = Vec::with_capacity(rows.len());
    let mut util = Vec::with_capacity(rows.len());
    let mut error = Vec::with_capacity(rows.len());
    for (k, p) in rows.iter().enumerate() {
        match calc.calculate_params(p) {
            Ok(r) => {
                total.push(Some(r.total_dies as u64));
                yielded.push(Some(r.yield_dies as u64));
                util.push(Some(r.wafer_utilization));
                error.push(None);
            }
            Err(e) => {
                tracing::warn!(row = k, error = %e, "batch row failed");
                total.push(None);
                yielded.push(None);
                util.push(None);
                error.push(Some(e.to_string()));
            }
        }
    }
    let mut df = df!(
        "die_size_x_um" => rows.iter().map(|p| p.die_size_x_um).collect::<Vec<f64>>(),
        "die_size_y_um" => rows.iter().map(|p| p.die_size_y_um).collect::<Vec<f64>>(),
        "scribe_lane_x_um" => rows.iter().map(|p| p.scribe_lane_x_um).collect::<Vec<f64>>(),
        "scribe_lane_y_um" => rows.iter().map(|p| p.scribe_lane_y_um).collect::<Vec<f64>>(),
        "wafer_diameter_mm" => rows.iter().map(|p| p.wafer_diameter_mm).collect::<Vec<f64>>(),
        "edge_exclusion_mm" => rows.iter().map(|p| p.edge_exclusion_mm).collect::<Vec<f64>>(),
        "yield_percentage" => rows.iter().map(|p| p.yield_percentage).collect::<Vec<f64>>(),
        "validation_method" => rows.iter().map(|p| p.validation_method.as_str()).collect::<Vec<&str>>(),
        "notch_type" => rows.iter().map(|p| p.notch_type.as_str()).collect::<Vec<&str>>(),
        "notch_depth_mm" => rows.iter().map(|p| p.notch_depth_mm).collect::<Vec<f64>>(),
        "total_dies" => total,
        "yield_dies" => yielded,
        "wafer_utilization" => util,
        "error" => error,
    )?;
    write_frame(&mut df, out, Format::Csv)?;
    let failed = df.height() - df.column("error")?.null_count();
    let payload = Payload::new(json!({
        "input": input.to_string_lossy(),
        "engine": calc.cfg(),
    }))
    .with_summary(json!({ "rows": df.height(), "failed": failed }));
    write_sidecar(out, payload)?;
    tracing::info!(rows = df.height(), failed, out = %out.display(), "batch finished");
    Ok(df.height())
}
