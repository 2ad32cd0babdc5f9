//! CSV serialization of normalized feature tables.
//!
//! The on-disk layout mirrors the tables exchanged with the upstream OpenMS
//! pipeline: `Mass [m/z], retention_time, charge, <sample>, rt_start, rt_end`,
//! where `<sample>` is the blank-sample abundance column named after the run.

use std::path::Path;

use log::warn;
use serde::Serialize;

use super::{Feature, FeatureTable, TableError};

/// Display label for the mass column, fixed across all outputs
pub const MASS_COLUMN: &str = "Mass [m/z]";

/// On-disk row layout. The blank-abundance column is named after the sample,
/// so the header is written separately and rows are serialized headerless.
#[derive(Serialize)]
struct TableRow {
    mz: f64,
    retention_time: f64,
    charge: i32,
    intensity: f64,
    rt_start: f64,
    rt_end: f64,
}

/// Write a feature table as a comma-separated file.
pub fn write_table<P: AsRef<Path>>(table: &FeatureTable, path: P) -> Result<(), TableError> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;

    writer.write_record([
        MASS_COLUMN,
        "retention_time",
        "charge",
        table.sample_name.as_str(),
        "rt_start",
        "rt_end",
    ])?;

    for f in &table.features {
        writer.serialize(TableRow {
            mz: f.mz,
            retention_time: f.retention_time,
            charge: f.charge,
            intensity: f.intensity,
            rt_start: f.rt_start,
            rt_end: f.rt_end,
        })?;
    }

    writer.flush()?;
    Ok(())
}

/// Read a feature table back from a comma-separated file.
///
/// When `sample_column` is `None` the blank column is inferred by the legacy
/// positional convention: the column immediately preceding the two
/// retention-window columns. Callers that know the sample name should pass
/// it explicitly; the inference exists for byte-compatibility with tables
/// produced by older pipelines.
pub fn read_table<P: AsRef<Path>>(
    path: P,
    sample_column: Option<&str>,
) -> Result<FeatureTable, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let col = |name: &str| -> Result<usize, TableError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    };

    let mz_idx = col(MASS_COLUMN)?;
    let rt_idx = col("retention_time")?;
    let charge_idx = col("charge")?;
    let rt_start_idx = col("rt_start")?;
    let rt_end_idx = col("rt_end")?;

    let sample_idx = match sample_column {
        Some(name) => col(name)?,
        // Legacy convention: the blank-abundance column sits directly before
        // rt_start/rt_end in column order.
        None => rt_start_idx
            .checked_sub(1)
            .ok_or_else(|| TableError::MissingColumn("blank sample".to_string()))?,
    };
    let sample_name = headers
        .get(sample_idx)
        .ok_or_else(|| TableError::MissingColumn("blank sample".to_string()))?
        .clone();

    let mut table = FeatureTable::new(sample_name);

    for (row_no, record) in reader.records().enumerate() {
        let record = record?;
        let field = |idx: usize| record.get(idx).unwrap_or_default();

        let parsed = (|| -> Option<Feature> {
            Some(Feature {
                mz: field(mz_idx).parse().ok()?,
                retention_time: field(rt_idx).parse().ok()?,
                charge: field(charge_idx).parse().unwrap_or(0),
                intensity: field(sample_idx).parse().ok()?,
                rt_start: field(rt_start_idx).parse().ok()?,
                rt_end: field(rt_end_idx).parse().ok()?,
            })
        })();

        match parsed {
            Some(feature) => table.features.push(feature),
            None => warn!("Skipping malformed table row {}", row_no + 2),
        }
    }

    Ok(table)
}
