//! XCalibur (Q Exactive) exclusion-list export.
//!
//! The instrument imports a comma-separated inclusion/exclusion table with a
//! fixed 12-column layout; retention times are expressed in minutes.

use std::path::Path;

use super::{ExportedWindow, ExporterError};
use crate::table::ExclusionList;

const COLUMNS: [&str; 12] = [
    "Mass [m/z]",
    "Formula [M]",
    "Formula type",
    "Species",
    "CS [z]",
    "Polarity",
    "Start [min]",
    "End [min]",
    "(N)CE",
    "(N)CE type",
    "MSX ID",
    "Comment",
];

/// Write an exclusion list in XCalibur's inclusion/exclusion CSV layout.
///
/// An empty list produces a header-only file the instrument still accepts.
pub fn write_xcalibur_list<P: AsRef<Path>>(
    list: &ExclusionList,
    path: P,
) -> Result<(), ExporterError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(COLUMNS)?;

    for entry in &list.entries {
        let charge = if entry.charge > 0 {
            entry.charge.to_string()
        } else {
            String::new()
        };
        writer.write_record([
            format!("{:.4}", entry.mz),
            String::new(),
            String::new(),
            String::new(),
            charge,
            "Positive".to_string(),
            format!("{:.2}", entry.rt_start / 60.0),
            format!("{:.2}", entry.rt_end / 60.0),
            String::new(),
            String::new(),
            String::new(),
            list.sample_name.clone(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Re-read an XCalibur list, converting the minute-based windows back to
/// seconds.
pub fn read_xcalibur_list<P: AsRef<Path>>(path: P) -> Result<Vec<ExportedWindow>, ExporterError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let col = |name: &str| -> Result<usize, ExporterError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ExporterError::MissingColumn(name.to_string()))
    };

    let mass_idx = col("Mass [m/z]")?;
    let charge_idx = col("CS [z]")?;
    let start_idx = col("Start [min]")?;
    let end_idx = col("End [min]")?;

    let mut windows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |idx: usize| record.get(idx).unwrap_or_default();
        let num = |idx: usize| -> Result<f64, ExporterError> {
            field(idx)
                .parse()
                .map_err(|_| ExporterError::InvalidField(field(idx).to_string()))
        };

        windows.push(ExportedWindow {
            mz: num(mass_idx)?,
            rt_start: num(start_idx)? * 60.0,
            rt_end: num(end_idx)? * 60.0,
            charge: field(charge_idx).parse().unwrap_or(0),
        });
    }

    Ok(windows)
}
