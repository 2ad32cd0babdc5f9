//! Line-based parser for the mzTab documents produced by the upstream
//! feature-detection pipeline.

use std::fs;
use std::path::Path;

use log::{info, warn};

use super::MzTabError;
use crate::table::{Feature, FeatureTable};

/// Parse an mzTab file into a normalized feature table for its first sample.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<FeatureTable, MzTabError> {
    let text = fs::read_to_string(path)?;
    parse_str(&text)
}

/// Parse mzTab text into a normalized feature table.
///
/// The metadata block is scanned for `file:/...` run locations (the first one
/// names the blank sample), then the data block is located by its own column
/// header row rather than by counting metadata lines. Malformed data rows are
/// dropped with a warning; the result is stable-sorted by retention time.
pub fn parse_str(text: &str) -> Result<FeatureTable, MzTabError> {
    let lines: Vec<&str> = text.lines().collect();

    let sample_names = collect_sample_names(&lines);
    let sample_name = sample_names
        .first()
        .cloned()
        .ok_or(MzTabError::NoSampleMetadata)?;

    info!("Filename(s) in the mzTab: {:?}", sample_names);
    if sample_names.len() > 1 {
        warn!(
            "The mzTab contains {} samples; only the first ('{}') is supported and will be used",
            sample_names.len(),
            sample_name
        );
    }

    let header_idx = lines
        .iter()
        .position(|line| is_data_header(line))
        .ok_or(MzTabError::NoDataBlock)?;

    let mut table = FeatureTable::new(sample_name);
    let data = lines[header_idx..].join("\n");

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .has_headers(true)
        .from_reader(data.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let columns = ColumnIndices::resolve(&headers)?;

    let mut skipped = 0usize;
    for (row_no, record) in reader.records().enumerate() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                warn!("Skipping unreadable mzTab row {}: {}", row_no + 1, e);
                skipped += 1;
                continue;
            }
        };

        match columns.parse_row(&record) {
            Some(feature) => table.features.push(feature),
            None => {
                warn!("Skipping malformed mzTab row {}", row_no + 1);
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!("Dropped {} malformed row(s) from the mzTab data block", skipped);
    }

    table.sort_by_retention_time();
    info!("Parsed {} features for sample '{}'", table.len(), table.sample_name);

    Ok(table)
}

/// Extract the declared run locations from the metadata block and derive
/// sample names: the final path segment with its extension stripped,
/// deduplicated in declaration order.
fn collect_sample_names(lines: &[&str]) -> Vec<String> {
    let mut names = Vec::new();
    for line in lines {
        if is_data_header(line) {
            break;
        }
        for field in line.split('\t') {
            if !field.starts_with("file:/") {
                continue;
            }
            let base = field.rsplit('/').next().unwrap_or(field);
            let stem = match base.rfind('.') {
                Some(dot) if dot > 0 => &base[..dot],
                _ => base,
            };
            if !stem.is_empty() && !names.iter().any(|n| n == stem) {
                names.push(stem.to_string());
            }
        }
    }
    names
}

/// The data block announces itself with its own column-header row.
fn is_data_header(line: &str) -> bool {
    let mut has_mz = false;
    let mut has_rt = false;
    for field in line.split('\t') {
        if field.starts_with("mass_to_charge") {
            has_mz = true;
        }
        if field == "retention_time" {
            has_rt = true;
        }
    }
    has_mz && has_rt
}

/// Resolved positions of the columns of interest in the data block.
struct ColumnIndices {
    mz: usize,
    charge: usize,
    retention_time: usize,
    rt_window: usize,
    abundance: usize,
}

impl ColumnIndices {
    fn resolve(headers: &[String]) -> Result<Self, MzTabError> {
        let prefix = |p: &str| -> Result<usize, MzTabError> {
            headers
                .iter()
                .position(|h| h.starts_with(p))
                .ok_or_else(|| MzTabError::MissingColumn(p.to_string()))
        };
        let exact = |name: &str| -> Result<usize, MzTabError> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| MzTabError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            mz: prefix("mass_to_charge")?,
            charge: prefix("charge")?,
            retention_time: exact("retention_time")?,
            rt_window: exact("retention_time_window")?,
            abundance: prefix("peptide_abundance_study_variable")?,
        })
    }

    /// Parse one data row; `None` marks the row as malformed.
    fn parse_row(&self, record: &csv::StringRecord) -> Option<Feature> {
        let field = |idx: usize| record.get(idx).map(str::trim).unwrap_or_default();

        let mz: f64 = field(self.mz).parse().ok()?;
        if mz <= 0.0 {
            return None;
        }
        let retention_time: f64 = field(self.retention_time).parse().ok()?;

        // Composite "<start>|<end>" window column.
        let (start_str, end_str) = field(self.rt_window).split_once('|')?;
        let rt_start: f64 = start_str.trim().parse().ok()?;
        let rt_end: f64 = end_str.trim().parse().ok()?;

        let intensity: f64 = field(self.abundance).parse().ok()?;

        // Charge may be absent or "null" when the charge state is unresolved.
        let charge: i32 = field(self.charge).parse().unwrap_or(0);

        Some(Feature {
            mz,
            charge,
            retention_time,
            rt_start,
            rt_end,
            intensity,
        })
    }
}
