//! In-memory feature table shared by every pipeline stage.
//!
//! A [`FeatureTable`] is produced by the mzTab parser, merged and
//! margin-expanded by [`merge`], filtered into an [`ExclusionList`] by
//! [`filter`], and finally consumed by the exporters and plots.

use serde::{Deserialize, Serialize};

pub mod csv_io;
pub mod filter;
pub mod merge;

#[cfg(test)]
mod tests;

pub use filter::{apply_intensity_filter, FilterStats};
pub use merge::merge;

/// Errors that can occur while building or transforming feature tables
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// I/O error reading or writing a table file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV parsing or writing error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Tables with different schemas cannot be concatenated
    #[error("Cannot merge tables with different sample columns: '{0}' vs '{1}'")]
    SchemaMismatch(String, String),

    /// No tables were supplied to the merger
    #[error("No feature tables to merge")]
    EmptyMerge,

    /// A table CSV is missing a required column
    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

/// One detected ion signal from a blank run.
///
/// `rt_start <= retention_time <= rt_end` holds as parsed; margin expansion
/// widens the window afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Mass-to-charge ratio (> 0)
    pub mz: f64,

    /// Charge state, 0 when unresolved
    pub charge: i32,

    /// Apex retention time in seconds
    pub retention_time: f64,

    /// Start of the integration window in seconds
    pub rt_start: f64,

    /// End of the integration window in seconds
    pub rt_end: f64,

    /// Abundance in the blank sample (0 = not observed)
    pub intensity: f64,
}

impl Feature {
    /// Width of the retention-time window in seconds
    pub fn rt_width(&self) -> f64 {
        self.rt_end - self.rt_start
    }
}

/// An ordered sequence of [`Feature`]s from one blank sample.
///
/// The blank-sample column name is carried explicitly rather than inferred
/// from column position; see [`csv_io::read_table`] for the legacy
/// positional fallback.
#[derive(Debug, Clone, Default)]
pub struct FeatureTable {
    /// Blank sample name, derived from the mzTab run location
    pub sample_name: String,

    /// Features, sorted ascending by retention time after parsing
    pub features: Vec<Feature>,
}

impl FeatureTable {
    /// Create an empty table for the given sample
    pub fn new(sample_name: impl Into<String>) -> Self {
        Self {
            sample_name: sample_name.into(),
            features: Vec::new(),
        }
    }

    /// Number of rows in the table
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Stable sort ascending by retention time; ties keep input order
    pub fn sort_by_retention_time(&mut self) {
        self.features
            .sort_by(|a, b| a.retention_time.total_cmp(&b.retention_time));
    }
}

/// Features that passed the intensity filter, ready for export.
///
/// Materialized once by [`apply_intensity_filter`]; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ExclusionList {
    /// Blank sample the entries were filtered against
    pub sample_name: String,

    /// Entries in the order the filter saw them
    pub entries: Vec<Feature>,
}

impl ExclusionList {
    /// Number of excluded ions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty (still valid for export)
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
