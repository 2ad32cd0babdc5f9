//! MaxQuant.Live exclusion-target export.
//!
//! MaxQuant.Live imports a tab-separated targets list. The window is encoded
//! as an apex/length pair in minutes rather than a start/end pair, so the
//! schema is deliberately incompatible with the XCalibur layout.

use std::path::Path;

use super::{ExportedWindow, ExporterError};
use crate::table::ExclusionList;

const COLUMNS: [&str; 6] = ["id", "mz", "rt", "rt_length", "charge", "intensity"];

/// Write an exclusion list as a MaxQuant.Live targets file.
///
/// `rt` is the window midpoint and `rt_length` the window width, both in
/// minutes. An empty list produces a header-only file.
pub fn write_mql_targets<P: AsRef<Path>>(
    list: &ExclusionList,
    path: P,
) -> Result<(), ExporterError> {
    let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_path(path)?;
    writer.write_record(COLUMNS)?;

    for (id, entry) in list.entries.iter().enumerate() {
        let midpoint_min = (entry.rt_start + entry.rt_end) / 2.0 / 60.0;
        let length_min = (entry.rt_end - entry.rt_start) / 60.0;
        writer.write_record([
            (id + 1).to_string(),
            format!("{:.5}", entry.mz),
            format!("{:.4}", midpoint_min),
            format!("{:.4}", length_min),
            entry.charge.to_string(),
            format!("{:.1}", entry.intensity),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Re-read a MaxQuant.Live targets file, reconstructing the start/end
/// windows in seconds from the apex/length encoding.
pub fn read_mql_targets<P: AsRef<Path>>(path: P) -> Result<Vec<ExportedWindow>, ExporterError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let col = |name: &str| -> Result<usize, ExporterError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ExporterError::MissingColumn(name.to_string()))
    };

    let mz_idx = col("mz")?;
    let rt_idx = col("rt")?;
    let len_idx = col("rt_length")?;
    let charge_idx = col("charge")?;

    let mut windows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |idx: usize| record.get(idx).unwrap_or_default();
        let num = |idx: usize| -> Result<f64, ExporterError> {
            field(idx)
                .parse()
                .map_err(|_| ExporterError::InvalidField(field(idx).to_string()))
        };

        let midpoint_secs = num(rt_idx)? * 60.0;
        let half_width_secs = num(len_idx)? * 60.0 / 2.0;
        windows.push(ExportedWindow {
            mz: num(mz_idx)?,
            rt_start: midpoint_secs - half_width_secs,
            rt_end: midpoint_secs + half_width_secs,
            charge: field(charge_idx).parse().unwrap_or(0),
        });
    }

    Ok(windows)
}
